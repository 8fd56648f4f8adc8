use serde_json::{Map, Value};

use crate::{
    models::{common::EntityId, post::kind},
    utils::json::{first_count, first_present, first_text},
};

/// One row of the 24h karma ranking. Rows arrive pre-sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub user_id: Option<EntityId>,
    pub display_name: String,
    pub total_karma: u64,
}

impl LeaderboardRow {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        let user = obj.get("user");

        let display_name = first_text(obj, &["owner_username", "username"])
            .or_else(|| match user {
                Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
                Some(Value::Object(u)) => first_text(u, &["username", "name", "id"]),
                _ => None,
            })
            .unwrap_or_else(|| Self::UNKNOWN.to_string());

        let user_id = first_present(obj, &["owner_id", "user_id"])
            .and_then(EntityId::from_value)
            .or_else(|| user.and_then(|u| u.get("id")).and_then(EntityId::from_value));

        Self {
            user_id,
            display_name,
            total_karma: first_count(obj, &["total_karma", "karma", "score", "value"]).unwrap_or(0),
        }
    }
}

/// Normalizes a leaderboard payload. An error object or any other
/// non-array shape is "no activity", not a failure.
pub fn leaderboard_from_value(value: &Value) -> Vec<LeaderboardRow> {
    match value {
        Value::Array(items) => items.iter().map(LeaderboardRow::from_value).collect(),
        other => {
            tracing::warn!("Leaderboard payload is not an array ({}), treating as empty", kind(other));
            Vec::new()
        }
    }
}
