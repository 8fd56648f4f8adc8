use async_trait::async_trait;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::{Value, json};
use url::Url;
use validator::Validate;

use crate::{
    api::FeedApi,
    config::{Config, LikeRoute},
    error::ClientError,
    models::{
        CreateCommentRequest, EntityId, LeaderboardRow, Post, leaderboard_from_value,
        posts_from_value,
    },
    utils::json::parse_bounded,
};

const FEED_FAILED: &str = "Failed to fetch feed";
const LEADERBOARD_FAILED: &str = "Failed to fetch leaderboard";
const LIKE_POST_FAILED: &str = "Failed to like post";
const LIKE_COMMENT_FAILED: &str = "Failed to like comment";
const CREATE_COMMENT_FAILED: &str = "Failed to create comment";

/// `FeedApi` over HTTP/JSON.
/// No timeouts are set: a hung request stays pending until the server answers.
#[derive(Debug, Clone)]
pub struct HttpFeedApi {
    client: Client,
    base_url: Url,
    like_route: LikeRoute,
}

impl HttpFeedApi {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            like_route: config.like_route,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL + `segments`, always ending in `/` the way the API's routes do.
    /// Segments are percent-encoded, so string ids cannot escape the path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    fn like_post_url(&self, post_id: &EntityId) -> Result<Url, ClientError> {
        let id = post_id.to_string();
        match self.like_route {
            LikeRoute::Canonical => self.endpoint(&["like", "post", &id]),
            LikeRoute::Legacy => self.endpoint(&["posts", &id, "like"]),
        }
    }

    /// GET for the read paths. Every failure collapses into the static message.
    async fn get_json(&self, segments: &[&str], failure: &str) -> Result<Value, ClientError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("{}: {:?}", failure, e);
            ClientError::Network(failure.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("{}: HTTP {}", failure, status);
            return Err(ClientError::Network(failure.to_string()));
        }

        Ok(parse_body(response).await)
    }

    /// POST for the write paths. A non-2xx answer is mapped to `Rejected`
    /// with the server's `error` text when the body carries one.
    async fn post_json<B>(&self, url: Url, body: Option<&B>, failure: &str) -> Result<Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url).header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("{}: {:?}", failure, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let payload = parse_body(response).await;
            let message = error_message(&payload).unwrap_or(failure).to_string();
            tracing::warn!("{}: HTTP {} ({})", failure, status, message);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parse_body(response).await)
    }
}

/// Body as JSON; an empty or unparsable body becomes `{}` so it never hides the status.
/// Threads nested past [`MAX_JSON_NESTING`](crate::utils::json::MAX_JSON_NESTING)
/// lose their deepest replies, not the whole body.
async fn parse_body(response: Response) -> Value {
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read response body: {}", e);
            return json!({});
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return json!({});
    }
    parse_bounded(&bytes).unwrap_or_else(|e| {
        tracing::warn!("Response body is not JSON ({} bytes): {}", bytes.len(), e);
        json!({})
    })
}

/// Human-readable error text from a failed write, if the server sent one.
pub fn error_message(payload: &Value) -> Option<&str> {
    ["error", "detail"]
        .iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_str))
        .find(|message| !message.trim().is_empty())
}

#[async_trait]
impl FeedApi for HttpFeedApi {
    async fn fetch_feed(&self) -> Result<Vec<Post>, ClientError> {
        let payload = self.get_json(&["feed"], FEED_FAILED).await?;
        let posts = posts_from_value(&payload);
        tracing::info!("Fetched feed: {} posts", posts.len());
        Ok(posts)
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardRow>, ClientError> {
        let payload = self.get_json(&["leaderboard"], LEADERBOARD_FAILED).await?;
        Ok(leaderboard_from_value(&payload))
    }

    async fn like_post(&self, post_id: &EntityId) -> Result<Value, ClientError> {
        let url = self.like_post_url(post_id)?;
        let result = self.post_json::<()>(url, None, LIKE_POST_FAILED).await?;
        tracing::info!("Liked post {}", post_id);
        Ok(result)
    }

    async fn like_comment(&self, comment_id: &EntityId) -> Result<Value, ClientError> {
        let id = comment_id.to_string();
        let url = self.endpoint(&["like", "comment", &id])?;
        let result = self.post_json::<()>(url, None, LIKE_COMMENT_FAILED).await?;
        tracing::info!("Liked comment {}", comment_id);
        Ok(result)
    }

    async fn create_comment(
        &self,
        post_id: &EntityId,
        content: &str,
        parent_id: Option<&EntityId>,
    ) -> Result<Value, ClientError> {
        let payload = CreateCommentRequest::new(content, parent_id.cloned());
        payload.validate()?;

        let id = post_id.to_string();
        let url = self.endpoint(&["posts", &id, "comments"])?;
        let result = self.post_json(url, Some(&payload), CREATE_COMMENT_FAILED).await?;
        match parent_id {
            Some(parent) => tracing::info!("Replied to comment {} on post {}", parent, post_id),
            None => tracing::info!("Commented on post {}", post_id),
        }
        Ok(result)
    }
}
