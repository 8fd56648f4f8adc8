use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::{
    api::FeedApi,
    error::ClientError,
    models::{EntityId, LeaderboardRow, Post, posts_from_value},
    views::{Notifier, ViewContext},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchFeed,
    FetchLeaderboard,
    LikePost(EntityId),
    LikeComment(EntityId),
    CreateComment {
        post_id: EntityId,
        content: String,
        parent_id: Option<EntityId>,
    },
}

/// In-memory `FeedApi` that records every call.
pub struct FakeApi {
    pub feed: Mutex<Result<Vec<Post>, ClientError>>,
    pub leaderboard: Mutex<Result<Vec<LeaderboardRow>, ClientError>>,
    pub write_error: Mutex<Option<ClientError>>,
    pub calls: Mutex<Vec<Call>>,
    pub delay: Option<Duration>,
}

impl FakeApi {
    pub fn with_feed(feed: Value) -> Self {
        Self {
            feed: Mutex::new(Ok(posts_from_value(&feed))),
            leaderboard: Mutex::new(Ok(Vec::new())),
            write_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn set_feed(&self, feed: Value) {
        *self.feed.lock().unwrap() = Ok(posts_from_value(&feed));
    }

    pub fn fail_writes(&self, err: ClientError) {
        *self.write_error.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    async fn record(&self, call: Call) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(call);
    }

    fn write_result(&self) -> Result<Value, ClientError> {
        match self.write_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(json!({"liked": true})),
        }
    }
}

#[async_trait]
impl FeedApi for FakeApi {
    async fn fetch_feed(&self) -> Result<Vec<Post>, ClientError> {
        self.record(Call::FetchFeed).await;
        self.feed.lock().unwrap().clone()
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardRow>, ClientError> {
        self.record(Call::FetchLeaderboard).await;
        self.leaderboard.lock().unwrap().clone()
    }

    async fn like_post(&self, post_id: &EntityId) -> Result<Value, ClientError> {
        self.record(Call::LikePost(post_id.clone())).await;
        self.write_result()
    }

    async fn like_comment(&self, comment_id: &EntityId) -> Result<Value, ClientError> {
        self.record(Call::LikeComment(comment_id.clone())).await;
        self.write_result()
    }

    async fn create_comment(
        &self,
        post_id: &EntityId,
        content: &str,
        parent_id: Option<&EntityId>,
    ) -> Result<Value, ClientError> {
        self.record(Call::CreateComment {
            post_id: post_id.clone(),
            content: content.to_string(),
            parent_id: parent_id.cloned(),
        })
        .await;
        self.write_result()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub fn ctx<'a>(
    api: &'a FakeApi,
    notifier: &'a RecordingNotifier,
    token: &'a CancellationToken,
) -> ViewContext<'a> {
    ViewContext {
        api,
        notifier,
        token,
    }
}
