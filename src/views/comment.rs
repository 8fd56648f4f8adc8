use crate::{
    models::{Comment, EntityId},
    views::{Line, Mutation, ViewContext},
};

/// Interactive state for one comment and, recursively, its replies.
///
/// The like counter starts from the server's value and is only ever bumped
/// locally; the feed reload that follows a successful like replaces the
/// whole node with fresh server data.
#[derive(Debug, Clone)]
pub struct CommentNode {
    comment: Comment,
    likes: u64,
    liking: bool,
    reply_open: bool,
    draft: String,
    submitting: bool,
    replies: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(mut comment: Comment) -> Self {
        let replies = std::mem::take(&mut comment.replies)
            .into_iter()
            .map(CommentNode::new)
            .collect();
        Self {
            likes: comment.likes,
            comment,
            liking: false,
            reply_open: false,
            draft: String::new(),
            submitting: false,
            replies,
        }
    }

    /// The comment's own data; its replies live in [`CommentNode::replies`].
    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn is_reply_open(&self) -> bool {
        self.reply_open
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn replies(&self) -> &[CommentNode] {
        &self.replies
    }

    /// Descendant at `path` (sibling indexes below this node); empty path is `self`.
    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut CommentNode> {
        match path.split_first() {
            None => Some(self),
            Some((&index, rest)) => self.replies.get_mut(index)?.node_mut(rest),
        }
    }

    pub fn toggle_reply(&mut self) {
        self.reply_open = !self.reply_open;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Likes this comment. On success the counter goes up by exactly one.
    /// On failure the user is alerted and the counter is left alone.
    pub async fn like(&mut self, ctx: ViewContext<'_>) -> Mutation {
        if self.liking {
            return Mutation::Unchanged;
        }
        let Some(id) = self.comment.id.clone() else {
            tracing::warn!("Comment has no id, can't like: {:?}", self.comment.content);
            return Mutation::Unchanged;
        };

        self.liking = true;
        let result = ctx.api.like_comment(&id).await;
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
                tracing::error!("Like comment {} failed: {}", id, e);
                ctx.notifier.alert(e.user_message());
                Mutation::Unchanged
            }
        }
    }

    /// Posts the draft as a reply to this comment.
    ///
    /// A blank draft sends nothing. On failure the box stays open with the
    /// draft intact so the user can retry.
    pub async fn submit_reply(&mut self, post_id: &EntityId, ctx: ViewContext<'_>) -> Mutation {
        if self.submitting || self.draft.trim().is_empty() {
            return Mutation::Unchanged;
        }
        let Some(parent_id) = self.comment.id.clone() else {
            tracing::warn!("Comment has no id, can't reply: {:?}", self.comment.content);
            return Mutation::Unchanged;
        };

        self.submitting = true;
        let result = ctx
            .api
            .create_comment(post_id, &self.draft, Some(&parent_id))
            .await;
        if ctx.token.is_cancelled() {
            return Mutation::Unchanged;
        }
        self.submitting = false;

        match result {
            Ok(_) => {
                self.draft.clear();
                self.reply_open = false;
                Mutation::Mutated
            }
            Err(e) => {
                tracing::error!("Reply to comment {} failed: {}", parent_id, e);
                ctx.notifier.alert(e.user_message());
                Mutation::Unchanged
            }
        }
    }

    /// Renders this comment, then every reply at `depth + 1`, in server order.
    /// No cap here; depth is bounded once, when the payload is parsed.
    pub fn render(&self, depth: usize, out: &mut Vec<Line>) {
        let indent = depth + 1;
        let c = &self.comment;

        out.push(Line::new(
            indent,
            format!("{} · {}", c.author.display_name, c.created_at),
        ));
        out.push(Line::new(indent, c.content.clone()));
        out.push(Line::new(
            indent,
            format!(
                "[{}] ({})  [Reply]",
                if self.liking { "Liking…" } else { "Like" },
                self.likes
            ),
        ));
        if self.reply_open {
            let status = if self.submitting { "  (sending…)" } else { "" };
            out.push(Line::new(indent, format!("> {}_{}", self.draft, status)));
        }

        for reply in &self.replies {
            reply.render(depth + 1, out);
        }
    }
}
