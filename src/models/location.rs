//! Conversions between JSON pointers and the dotted paths shown in reports
//!
//! `/methodologies/scrum/events/2/outcomes` is rendered as
//! `methodologies.scrum.events[2].outcomes`. The document root is `$`.

use serde_json::Value as JsonValue;

/// Path shown for the document root
pub const ROOT_PATH: &str = "$";

/// Split a JSON pointer into unescaped reference tokens
pub fn pointer_segments(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .strip_prefix('/')
        .unwrap_or(pointer)
        .split('/')
        .map(unescape_token)
        .collect()
}

/// Append one property or index to a JSON pointer
pub fn join_pointer(parent: &str, token: &str) -> String {
    format!("{}/{}", parent, escape_token(token))
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Render a JSON pointer as a dotted path
///
/// When the document is available, numeric tokens are shown as `[n]` only where
/// they index an array; an object key that happens to be numeric stays a key.
/// Without the document every numeric token is treated as an index.
pub fn dotted_path(pointer: &str, document: Option<&JsonValue>) -> String {
    let segments = pointer_segments(pointer);
    if segments.is_empty() {
        return ROOT_PATH.to_string();
    }

    let mut path = String::new();
    let mut cursor = document;

    for segment in &segments {
        let is_index = match cursor {
            Some(JsonValue::Array(_)) => true,
            Some(_) => false,
            None => segment.parse::<usize>().is_ok(),
        };

        if is_index {
            path.push('[');
            path.push_str(segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);
        }

        cursor = match cursor {
            Some(JsonValue::Array(items)) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Some(JsonValue::Object(map)) => map.get(segment.as_str()),
            _ => None,
        };
    }

    path
}
