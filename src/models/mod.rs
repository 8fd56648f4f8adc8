// src/models/mod.rs

pub mod comment;
pub mod common;
pub mod leaderboard;
pub mod post;

pub use comment::{Comment, CommentPath, CreateCommentRequest};
pub use common::{Author, EntityId, Timestamp};
pub use leaderboard::{LeaderboardRow, leaderboard_from_value};
pub use post::{Post, posts_from_value};
