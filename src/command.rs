// src/command.rs

use std::str::FromStr;

use community_feed::models::CommentPath;

pub const HELP: &str = "\
commands:
  refresh                         reload feed and leaderboard
  like <post#> [path]             like a post, or the comment at path (e.g. 2.1)
  comment <post#> <text>          add a top-level comment
  reply <post#> <path> <text>     reply to the comment at path
  retry <post#> [path]            resend the draft kept after a failed comment/reply
  help
  quit";

/// One line typed at the prompt. Post numbers and paths are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Like { post: usize, path: Option<CommentPath> },
    Comment { post: usize, text: String },
    Reply { post: usize, path: CommentPath, text: String },
    Retry { post: usize, path: Option<CommentPath> },
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();

        match verb.to_ascii_lowercase().as_str() {
            "refresh" | "r" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            "like" => {
                let (post, rest) = post_number(rest)?;
                Ok(Command::Like {
                    post,
                    path: optional_path(rest)?,
                })
            }
            "retry" => {
                let (post, rest) = post_number(rest)?;
                Ok(Command::Retry {
                    post,
                    path: optional_path(rest)?,
                })
            }
            "comment" => {
                let (post, text) = post_number(rest)?;
                Ok(Command::Comment {
                    post,
                    text: text.to_string(),
                })
            }
            "reply" => {
                let (post, rest) = post_number(rest)?;
                let (raw_path, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let path = CommentPath::parse_one_based(raw_path)
                    .ok_or_else(|| format!("bad comment path '{}'", raw_path))?;
                Ok(Command::Reply {
                    post,
                    path,
                    text: text.trim_start().to_string(),
                })
            }
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

/// Leading 1-based post number, as a 0-based index, plus the remainder.
fn post_number(input: &str) -> Result<(usize, &str), String> {
    let (raw, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .map(|index| (index, rest.trim_start()))
        .ok_or_else(|| format!("expected a post number, got '{}'", raw))
}

fn optional_path(input: &str) -> Result<Option<CommentPath>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    CommentPath::parse_one_based(input)
        .map(Some)
        .ok_or_else(|| format!("bad comment path '{}'", input))
}
