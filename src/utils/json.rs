use std::borrow::Cow;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Deepest array/object nesting kept from a response body.
///
/// A feed spends three levels on the post list, the post and its `comments`
/// array, then two per reply level (object + `replies`), so this keeps
/// threads 127 comments deep. Anything deeper is cut to `null` before parsing
/// and the rest of the payload survives.
pub const MAX_JSON_NESTING: usize = 256;

/// First value among `keys` that is present and not `null`.
///
/// The API has renamed fields over time (`id`/`pk`/`_id`, `content`/`body`/`text`),
/// so every lookup at the ingestion boundary goes through an ordered alias list.
pub fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Like [`first_present`], but only accepts non-empty strings.
/// Numbers are rendered as text so `{"body": 42}` still shows something.
pub fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| obj.get(*key)).find_map(|value| match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Non-negative counter among `keys`. Accepts numeric strings; negatives clamp to 0.
pub fn first_count(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().filter_map(|key| obj.get(*key)).find_map(|value| match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|v| v.max(0) as u64))
            .or_else(|| n.as_f64().map(|v| v.max(0.0) as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Array under `key`, or an empty slice for anything else.
pub fn array_or_empty<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match obj.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Parses a response body, pruning containers nested past [`MAX_JSON_NESTING`].
///
/// serde_json's own recursion limit (128) is switched off: pruning already
/// bounds the depth, and leaving it on would fail the whole body, not just
/// the deep thread.
pub fn parse_bounded(body: &[u8]) -> Result<Value, serde_json::Error> {
    let body = prune_nesting(body, MAX_JSON_NESTING);
    if let Cow::Owned(_) = body {
        tracing::warn!("Response nests deeper than {} levels, deepest replies dropped", MAX_JSON_NESTING);
    }

    let mut de = serde_json::Deserializer::from_slice(&body);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Replaces every array or object that opens deeper than `max` with `null`.
/// Borrows the input untouched when nothing is that deep.
///
/// Works on raw bytes: only string state and bracket depth are tracked, so
/// malformed input stays malformed and fails later in the parser.
pub fn prune_nesting(input: &[u8], max: usize) -> Cow<'_, [u8]> {
    let mut out: Option<Vec<u8>> = None;
    let mut depth = 0usize;
    // depth of the container being replaced, while inside it
    let mut skipping: Option<usize> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in input.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
        } else {
            match byte {
                b'"' => in_string = true,
                b'[' | b'{' => {
                    depth += 1;
                    if depth > max && skipping.is_none() {
                        skipping = Some(depth);
                        out.get_or_insert_with(|| input[..i].to_vec())
                            .extend_from_slice(b"null");
                        continue;
                    }
                }
                b']' | b'}' => {
                    let closing = depth;
                    depth = depth.saturating_sub(1);
                    if skipping == Some(closing) {
                        skipping = None;
                        continue;
                    }
                }
                _ => {}
            }
        }

        if skipping.is_none() {
            if let Some(out) = out.as_mut() {
                out.push(byte);
            }
        }
    }

    match out {
        Some(pruned) => Cow::Owned(pruned),
        None => Cow::Borrowed(input),
    }
}
