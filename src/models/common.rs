use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Identifier of a post or comment.
/// The API hands out integers today, but older payloads used string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    /// Accepts integers and non-blank strings; anything else is unresolvable.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(EntityId::Int),
            Value::String(s) if !s.trim().is_empty() => Some(EntityId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{}", id),
            EntityId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

/// Canonical author record.
/// The server sends either a bare name or an object with `username`/`name`/`id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Option<EntityId>,
    pub display_name: String,
}

impl Author {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(name)) if !name.is_empty() => Self {
                id: None,
                display_name: name.clone(),
            },
            Some(Value::Object(obj)) => {
                let id = obj.get("id").and_then(EntityId::from_value);
                let display_name = ["username", "name"]
                    .iter()
                    .filter_map(|key| obj.get(*key).and_then(Value::as_str))
                    .find(|name| !name.is_empty())
                    .map(str::to_string)
                    .or_else(|| id.as_ref().map(|id| format!("user-{}", id)))
                    .unwrap_or_else(|| Self::UNKNOWN.to_string());
                Self { id, display_name }
            }
            Some(Value::Number(n)) => Self {
                id: None,
                display_name: n.to_string(),
            },
            _ => Self {
                id: None,
                display_name: Self::UNKNOWN.to_string(),
            },
        }
    }
}

/// Creation time as the server sent it, plus a parsed form when it parses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub raw: String,
    pub parsed: Option<DateTime<Utc>>,
}

impl Timestamp {
    pub fn from_value(value: Option<&Value>) -> Self {
        let raw = match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let parsed = parse_timestamp(&raw);
        Self { raw, parsed }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        // Django without USE_TZ emits naive ISO timestamps
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            None => f.write_str(&self.raw),
        }
    }
}
