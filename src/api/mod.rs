// src/api/mod.rs

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::ClientError,
    models::{EntityId, LeaderboardRow, Post},
};

pub use http::HttpFeedApi;

/// The remote community API as the views see it.
///
/// Reads come back already normalized; writes return whatever the server
/// sent, since the views never merge it and re-fetch the feed instead.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// `GET /feed/`. A non-array body is an empty feed.
    async fn fetch_feed(&self) -> Result<Vec<Post>, ClientError>;

    /// `GET /leaderboard/`. A non-array body is an empty ranking.
    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardRow>, ClientError>;

    async fn like_post(&self, post_id: &EntityId) -> Result<Value, ClientError>;

    async fn like_comment(&self, comment_id: &EntityId) -> Result<Value, ClientError>;

    /// Root comment when `parent_id` is `None`, reply otherwise.
    async fn create_comment(
        &self,
        post_id: &EntityId,
        content: &str,
        parent_id: Option<&EntityId>,
    ) -> Result<Value, ClientError>;
}
