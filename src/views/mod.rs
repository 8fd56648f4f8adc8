// src/views/mod.rs

pub mod comment;
pub mod feed;
pub mod leaderboard;
pub mod post;

#[cfg(test)]
pub(crate) mod testing;

use tokio_util::sync::CancellationToken;

use crate::api::FeedApi;

pub use comment::CommentNode;
pub use feed::{FeedController, FeedState};
pub use leaderboard::LeaderboardPanel;
pub use post::PostCard;

/// Blocking, user-facing notification for failed writes.
/// Read failures never come through here; they only get logged.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints alerts to stderr, above the next prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!("!! {}", message);
    }
}

/// What a user action did to server state.
/// `Mutated` travels up to the feed, which answers with a full reload.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Mutated,
    Unchanged,
}

/// Everything a card needs to act on the server, handed down unchanged
/// through the comment tree.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub api: &'a dyn FeedApi,
    pub notifier: &'a dyn Notifier,
    /// Checked after every await; once cancelled no view state is touched.
    pub token: &'a CancellationToken,
}

/// One line of rendered output. `indent` is presentation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub indent: usize,
    pub text: String,
}

impl Line {
    pub fn new(indent: usize, text: impl Into<String>) -> Self {
        Self {
            indent,
            text: text.into(),
        }
    }
}

/// Joins rendered lines, two spaces and a rule per indent level.
pub fn render_text(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        for _ in 0..line.indent {
            out.push_str("  │");
        }
        if line.indent > 0 {
            out.push(' ');
        }
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}
