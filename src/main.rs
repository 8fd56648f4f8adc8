// src/main.rs

mod command;

use std::sync::Arc;

use command::{Command, HELP};
use community_feed::{
    FeedApi, HttpFeedApi,
    config::Config,
    utils::scope::ViewScope,
    views::{FeedController, LeaderboardPanel, TerminalNotifier, render_text},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "community-feed.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    // stdout belongs to the rendered feed
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Using API at {} ({:?} like route)", config.base_url, config.like_route);

    let api: Arc<dyn FeedApi> = Arc::new(HttpFeedApi::new(&config));
    let scope = ViewScope::new();
    let mut leaderboard = LeaderboardPanel::new(api.clone(), scope.token());
    let mut feed = FeedController::new(api, Arc::new(TerminalNotifier), scope.token());

    tokio::join!(leaderboard.load(), feed.load());
    print_screen(&feed, &leaderboard);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Refresh => {
                tokio::join!(leaderboard.load(), feed.load());
            }
            Command::Like { post, path: None } => {
                let _ = feed.like_post(post).await;
            }
            Command::Like { post, path: Some(path) } => {
                let _ = feed.like_comment(post, &path).await;
            }
            Command::Comment { post, text } => {
                if let Some(card) = feed.post_mut(post) {
                    if !card.is_comment_box_open() {
                        card.toggle_comment_box();
                    }
                    card.set_draft(text);
                }
                let _ = feed.submit_comment(post).await;
            }
            Command::Reply { post, path, text } => {
                if let Some(node) = feed.post_mut(post).and_then(|card| card.comment_mut(&path)) {
                    if !node.is_reply_open() {
                        node.toggle_reply();
                    }
                    node.set_draft(text);
                }
                let _ = feed.reply(post, &path).await;
            }
            Command::Retry { post, path: None } => {
                let _ = feed.submit_comment(post).await;
            }
            Command::Retry { post, path: Some(path) } => {
                let _ = feed.reply(post, &path).await;
            }
        }

        print_screen(&feed, &leaderboard);
    }

    scope.teardown();
    tracing::info!("Bye");
}

fn print_screen(feed: &FeedController, leaderboard: &LeaderboardPanel) {
    println!("{}", render_text(&leaderboard.render()));
    println!("{}", render_text(&feed.render()));
    println!("type 'help' for commands");
}
