use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    models::common::{Author, EntityId, Timestamp},
    utils::json::{array_or_empty, first_count, first_present, first_text},
};

pub(crate) const ID_KEYS: &[&str] = &["id", "pk", "_id"];
pub(crate) const CONTENT_KEYS: &[&str] = &["content", "body", "text"];
pub(crate) const CREATED_AT_KEYS: &[&str] = &["created_at", "createdAt", "date"];
pub(crate) const LIKE_KEYS: &[&str] = &["likes_count", "likes", "like_count"];

/// A comment and, recursively, its replies.
/// `parent_id` is informational only; ownership runs from the post downwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Option<EntityId>,
    pub parent_id: Option<EntityId>,
    pub author: Author,
    pub content: String,
    pub created_at: Timestamp,
    pub likes: u64,
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Normalizes one server comment object (and its reply subtree).
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        // Some serializers flatten the author to `author_username`
        let author = match obj.get("author_username") {
            Some(name @ Value::String(_)) => {
                let mut author = Author::from_value(Some(name));
                author.id = obj
                    .get("author")
                    .and_then(|a| a.get("id"))
                    .and_then(EntityId::from_value);
                author
            }
            _ => Author::from_value(obj.get("author")),
        };

        Self {
            id: first_present(obj, ID_KEYS).and_then(EntityId::from_value),
            parent_id: obj.get("parent_id").and_then(EntityId::from_value),
            author,
            content: first_text(obj, CONTENT_KEYS).unwrap_or_default(),
            created_at: Timestamp::from_value(first_present(obj, CREATED_AT_KEYS)),
            likes: first_count(obj, LIKE_KEYS).unwrap_or(0),
            replies: array_or_empty(obj, "replies")
                .iter()
                .map(Comment::from_value)
                .collect(),
        }
    }
}

/// Location of a comment inside a post: sibling indexes from the post root.
/// `[1, 0]` is the first reply to the second top-level comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CommentPath(pub Vec<usize>);

impl CommentPath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Parses the dot-separated, 1-based form typed at the prompt (`"2.1"`).
    pub fn parse_one_based(raw: &str) -> Option<Self> {
        raw.split('.')
            .map(|part| part.trim().parse::<usize>().ok()?.checked_sub(1))
            .collect::<Option<Vec<_>>>()
            .filter(|indexes| !indexes.is_empty())
            .map(Self)
    }
}

/// Body of `POST /posts/{id}/comments/`.
/// `parent_id` is always serialized; `null` means a root comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub content: String,

    /// Optional: the ID of the comment being replied to.
    pub parent_id: Option<EntityId>,
}

impl CreateCommentRequest {
    /// Builds the request from a draft; surrounding whitespace is dropped.
    pub fn new(draft: &str, parent_id: Option<EntityId>) -> Self {
        Self {
            content: draft.trim().to_string(),
            parent_id,
        }
    }
}
