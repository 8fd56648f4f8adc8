use crate::{
    models::{CommentPath, Post},
    views::{CommentNode, Line, Mutation, ViewContext},
};

/// A post, its comment box and its comment tree.
#[derive(Debug, Clone)]
pub struct PostCard {
    post: Post,
    likes: u64,
    liking: bool,
    comment_box_open: bool,
    draft: String,
    submitting: bool,
    comments: Vec<CommentNode>,
}

impl PostCard {
    pub fn new(mut post: Post) -> Self {
        let comments = std::mem::take(&mut post.comments)
            .into_iter()
            .map(CommentNode::new)
            .collect();
        Self {
            likes: post.likes,
            post,
            liking: false,
            comment_box_open: false,
            draft: String::new(),
            submitting: false,
            comments,
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn is_comment_box_open(&self) -> bool {
        self.comment_box_open
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Top-level comments, in server order.
    pub fn comments(&self) -> &[CommentNode] {
        &self.comments
    }

    pub fn comment_mut(&mut self, path: &CommentPath) -> Option<&mut CommentNode> {
        let (&first, rest) = path.0.split_first()?;
        self.comments.get_mut(first)?.node_mut(rest)
    }

    pub fn toggle_comment_box(&mut self) {
        self.comment_box_open = !self.comment_box_open;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Likes the post. A post with no resolvable id is skipped with a warning.
    pub async fn like(&mut self, ctx: ViewContext<'_>) -> Mutation {
        if self.liking {
            return Mutation::Unchanged;
        }
        let Some(id) = self.post.id.clone() else {
            tracing::warn!("Post has no id, can't like: {:?}", self.post.content);
            return Mutation::Unchanged;
        };

        self.liking = true;
        let result = ctx.api.like_post(&id).await;
        if ctx.token.is_cancelled() {
            return Mutation::Unchanged;
        }
        self.liking = false;

        match result {
            Ok(_) => {
                self.likes = self.likes.saturating_add(1);
                Mutation::Mutated
            }
            Err(e) => {
                tracing::error!("Like post {} failed: {}", id, e);
                ctx.notifier.alert(e.user_message());
                Mutation::Unchanged
            }
        }
    }

    /// Posts the draft as a root comment. Same guard and retry rules as a reply.
    pub async fn submit_comment(&mut self, ctx: ViewContext<'_>) -> Mutation {
        if self.submitting || self.draft.trim().is_empty() {
            return Mutation::Unchanged;
        }
        let Some(id) = self.post.id.clone() else {
            tracing::warn!("Post has no id, can't comment: {:?}", self.post.content);
            return Mutation::Unchanged;
        };

        self.submitting = true;
        let result = ctx.api.create_comment(&id, &self.draft, None).await;
        if ctx.token.is_cancelled() {
            return Mutation::Unchanged;
        }
        self.submitting = false;

        match result {
            Ok(_) => {
                self.draft.clear();
                self.comment_box_open = false;
                Mutation::Mutated
            }
            Err(e) => {
                tracing::error!("Comment on post {} failed: {}", id, e);
                ctx.notifier.alert(e.user_message());
                Mutation::Unchanged
            }
        }
    }

    pub async fn like_comment(&mut self, path: &CommentPath, ctx: ViewContext<'_>) -> Mutation {
        match self.comment_mut(path) {
            Some(node) => node.like(ctx).await,
            None => {
                tracing::warn!("No comment at {:?}", path);
                Mutation::Unchanged
            }
        }
    }

    pub async fn reply(&mut self, path: &CommentPath, ctx: ViewContext<'_>) -> Mutation {
        let Some(post_id) = self.post.id.clone() else {
            tracing::warn!("Post has no id, can't reply: {:?}", self.post.content);
            return Mutation::Unchanged;
        };
        match self.comment_mut(path) {
            Some(node) => node.submit_reply(&post_id, ctx).await,
            None => {
                tracing::warn!("No comment at {:?}", path);
                Mutation::Unchanged
            }
        }
    }

    pub fn render(&self, out: &mut Vec<Line>) {
        let p = &self.post;
        out.push(Line::new(0, format!("{} · {}", p.author.display_name, p.created_at)));
        out.push(Line::new(0, p.content.clone()));
        out.push(Line::new(
            0,
            format!(
                "[{}] {} likes  [Comments ({})]",
                if self.liking { "Liking…" } else { "Like" },
                self.likes,
                self.comments.len()
            ),
        ));
        if self.comment_box_open {
            let status = if self.submitting { "  (sending…)" } else { "" };
            out.push(Line::new(0, format!("> {}_{}", self.draft, status)));
        }
        for comment in &self.comments {
            comment.render(0, out);
        }
    }
}
