use serde_json::{Map, Value};

use crate::{
    models::{
        comment::{Comment, CONTENT_KEYS, CREATED_AT_KEYS, ID_KEYS, LIKE_KEYS},
        common::{Author, EntityId, Timestamp},
    },
    utils::json::{array_or_empty, first_count, first_present, first_text},
};

/// A feed entry with its top-level comments.
/// `likes` is advisory: it is overwritten on every feed reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// `None` when none of `id`/`pk`/`_id` resolves; such a post cannot be liked.
    pub id: Option<EntityId>,
    pub author: Author,
    pub content: String,
    pub created_at: Timestamp,
    pub likes: u64,
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        Self {
            id: first_present(obj, ID_KEYS).and_then(EntityId::from_value),
            author: Author::from_value(obj.get("author")),
            content: first_text(obj, CONTENT_KEYS).unwrap_or_default(),
            created_at: Timestamp::from_value(first_present(obj, CREATED_AT_KEYS)),
            likes: first_count(obj, LIKE_KEYS).unwrap_or(0),
            comments: array_or_empty(obj, "comments")
                .iter()
                .map(Comment::from_value)
                .collect(),
        }
    }
}

/// Normalizes a feed payload. Anything but a JSON array is an empty feed.
pub fn posts_from_value(value: &Value) -> Vec<Post> {
    match value {
        Value::Array(items) => items.iter().map(Post::from_value).collect(),
        other => {
            tracing::warn!("Feed payload is not an array ({}), treating as empty", kind(other));
            Vec::new()
        }
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
