use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    api::FeedApi,
    models::CommentPath,
    views::{Line, Mutation, Notifier, PostCard, ViewContext},
};

/// What the feed currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    Empty,
    Loaded(usize),
}

/// Owns the post list and reloads all of it after any successful mutation.
///
/// There is no local patching: every like, comment or reply that the server
/// accepts is followed by exactly one full `GET /feed/`, and the new snapshot
/// replaces every card (and every optimistic counter) wholesale.
pub struct FeedController {
    api: Arc<dyn FeedApi>,
    notifier: Arc<dyn Notifier>,
    token: CancellationToken,
    loading: bool,
    posts: Vec<PostCard>,
}

impl FeedController {
    pub fn new(api: Arc<dyn FeedApi>, notifier: Arc<dyn Notifier>, token: CancellationToken) -> Self {
        Self {
            api,
            notifier,
            token,
            loading: true,
            posts: Vec::new(),
        }
    }

    pub fn state(&self) -> FeedState {
        if self.loading {
            FeedState::Loading
        } else if self.posts.is_empty() {
            FeedState::Empty
        } else {
            FeedState::Loaded(self.posts.len())
        }
    }

    pub fn posts(&self) -> &[PostCard] {
        &self.posts
    }

    pub fn post_mut(&mut self, index: usize) -> Option<&mut PostCard> {
        self.posts.get_mut(index)
    }

    /// Fetches the whole feed. Used on mount, on explicit refresh and after
    /// every mutation. A failed fetch is logged and shows the empty state.
    pub async fn load(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.loading = true;

        let result = self.api.fetch_feed().await;
        if self.token.is_cancelled() {
            tracing::debug!("Feed torn down, dropping fetch result");
            return;
        }

        match result {
            Ok(posts) => {
                self.posts = posts.into_iter().map(PostCard::new).collect();
            }
            Err(e) => {
                tracing::error!("fetch feed error: {}", e);
                self.posts.clear();
            }
        }
        self.loading = false;
    }

    pub async fn like_post(&mut self, index: usize) -> Mutation {
        let Some(card) = self.posts.get_mut(index) else {
            tracing::warn!("No post at index {}", index);
            return Mutation::Unchanged;
        };
        let ctx = ViewContext {
            api: self.api.as_ref(),
            notifier: self.notifier.as_ref(),
            token: &self.token,
        };
        let outcome = card.like(ctx).await;
        self.after(outcome).await
    }

    pub async fn submit_comment(&mut self, index: usize) -> Mutation {
        let Some(card) = self.posts.get_mut(index) else {
            tracing::warn!("No post at index {}", index);
            return Mutation::Unchanged;
        };
        let ctx = ViewContext {
            api: self.api.as_ref(),
            notifier: self.notifier.as_ref(),
            token: &self.token,
        };
        let outcome = card.submit_comment(ctx).await;
        self.after(outcome).await
    }

    pub async fn like_comment(&mut self, index: usize, path: &CommentPath) -> Mutation {
        let Some(card) = self.posts.get_mut(index) else {
            tracing::warn!("No post at index {}", index);
            return Mutation::Unchanged;
        };
        let ctx = ViewContext {
            api: self.api.as_ref(),
            notifier: self.notifier.as_ref(),
            token: &self.token,
        };
        let outcome = card.like_comment(path, ctx).await;
        self.after(outcome).await
    }

    pub async fn reply(&mut self, index: usize, path: &CommentPath) -> Mutation {
        let Some(card) = self.posts.get_mut(index) else {
            tracing::warn!("No post at index {}", index);
            return Mutation::Unchanged;
        };
        let ctx = ViewContext {
            api: self.api.as_ref(),
            notifier: self.notifier.as_ref(),
            token: &self.token,
        };
        let outcome = card.reply(path, ctx).await;
        self.after(outcome).await
    }

    async fn after(&mut self, outcome: Mutation) -> Mutation {
        if outcome == Mutation::Mutated {
            self.load().await;
        }
        outcome
    }

    pub fn render(&self) -> Vec<Line> {
        let mut out = vec![Line::new(0, "Latest Posts")];
        match self.state() {
            FeedState::Loading => out.push(Line::new(0, "Loading posts...")),
            FeedState::Empty => {
                out.push(Line::new(0, "No posts yet"));
                out.push(Line::new(0, "Be the first to create a post!"));
            }
            FeedState::Loaded(_) => {
                for (i, card) in self.posts.iter().enumerate() {
                    out.push(Line::new(0, format!("#{}", i + 1)));
                    card.render(&mut out);
                }
            }
        }
        out
    }
}
