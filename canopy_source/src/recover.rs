// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-effort recovery of JSON from noisy source responses.
//!
//! Sources wrap their payloads in Markdown fences or surround them with
//! prose often enough that a strict parse would reject perfectly usable
//! answers. Recovery strips a leading ```` ```json ```` fence, tries a
//! strict parse, and only then falls back to the outermost `{…}` or `[…]`
//! substring of the raw text.

use serde_json::Value;

use crate::schema::{ExpandItem, RawNode, SourceError};

/// Strip a leading ```` ```json ```` fence and a trailing ```` ``` ````.
fn strip_fences(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```json") {
        t = rest;
    }
    if let Some(rest) = t.trim_end().strip_suffix("```") {
        t = rest;
    }
    t.trim()
}

/// The substring from the first `open` to the last `close`, if both exist
/// in that order.
fn outermost(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start { Some(&text[start..=end]) } else { None }
}

/// Recover a JSON object from a generation response.
///
/// Tries the fence-stripped text first, then the outermost `{…}` block of
/// the raw text.
pub fn recover_object(text: &str) -> Result<Value, SourceError> {
    let cleaned = strip_fences(text);
    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Ok(value);
    }
    if let Some(block) = outermost(text, '{', '}')
        && let Ok(value) = serde_json::from_str::<Value>(block)
    {
        tracing::warn!("parsed generation response after extracting embedded object");
        return Ok(value);
    }
    Err(SourceError::new("response was not valid JSON"))
}

/// Recover a generation response as a typed wire-schema tree.
///
/// Same recovery as [`recover_object`], then the result must deserialize
/// as a [`RawNode`]; a payload that parses but does not fit the schema
/// (an array root, a numeric `name`) is an error.
pub fn recover_node(text: &str) -> Result<RawNode, SourceError> {
    let value = recover_object(text)?;
    serde_json::from_value(value)
        .map_err(|_| SourceError::new("response does not match the node schema"))
}

/// Recover an expansion array, keeping only items with a string `name`.
///
/// Fails if no array can be parsed at all; use
/// [`recover_array_or_empty`] where an empty suggestion list is acceptable.
pub fn recover_array(text: &str) -> Result<Vec<ExpandItem>, SourceError> {
    let cleaned = strip_fences(text);
    let candidate = if cleaned.starts_with('[') && cleaned.ends_with(']') {
        cleaned
    } else {
        outermost(text, '[', ']')
            .ok_or_else(|| SourceError::new("response is not a JSON array"))?
    };
    let items: Vec<Value> = serde_json::from_str(candidate)
        .map_err(|_| SourceError::new("response was not a valid JSON array"))?;
    Ok(items
        .into_iter()
        .filter_map(|item| {
            let name = item.get("name")?.as_str()?;
            Some(ExpandItem {
                name: name.to_owned(),
            })
        })
        .collect())
}

/// Like [`recover_array`], but an unparseable payload recovers to an empty
/// list instead of an error. Transport failures should not come through
/// this path; they surface verbatim from the source itself.
pub fn recover_array_or_empty(text: &str) -> Vec<ExpandItem> {
    match recover_array(text) {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(%error, "expansion payload unrecoverable, treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_object_parses_directly() {
        let value = recover_object(r#"{"topic":"Flu","children":[]}"#).unwrap();
        assert_eq!(value, json!({"topic": "Flu", "children": []}));
    }

    #[test]
    fn fenced_object_parses_after_stripping() {
        let text = "```json\n{\"topic\":\"Flu\",\"children\":[]}\n```";
        let value = recover_object(text).unwrap();
        assert_eq!(value["topic"], "Flu");
    }

    #[test]
    fn prose_wrapped_object_recovers_from_the_embedded_block() {
        let text = "Here is your mind map:\n{\"topic\":\"Flu\"}\nHope this helps!";
        let value = recover_object(text).unwrap();
        assert_eq!(value, json!({"topic": "Flu"}));
    }

    #[test]
    fn hopeless_object_payload_errors() {
        let err = recover_object("no json here at all").unwrap_err();
        assert_eq!(err.message, "response was not valid JSON");
    }

    #[test]
    fn fenced_payload_recovers_as_a_typed_node() {
        let text = "```json\n{\"topic\":\"Flu\",\"children\":[{\"name\":\"Causes\"}]}\n```";
        let node = recover_node(text).unwrap();
        assert_eq!(node.topic.as_deref(), Some("Flu"));
        assert_eq!(node.name, None);
        let children = node.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name.as_deref(), Some("Causes"));
    }

    #[test]
    fn payload_that_parses_but_misses_the_schema_errors() {
        // Valid JSON, but `name` must be a string if present.
        let err = recover_node(r#"{"name": 7}"#).unwrap_err();
        assert_eq!(err.message, "response does not match the node schema");
    }

    #[test]
    fn array_items_without_a_string_name_are_dropped() {
        let text = r#"[{"name":"Virus"},{"label":"nope"},{"name":7},{"name":"Bacteria"}]"#;
        let items = recover_array(text).unwrap();
        assert_eq!(
            items,
            vec![
                ExpandItem {
                    name: "Virus".to_owned()
                },
                ExpandItem {
                    name: "Bacteria".to_owned()
                },
            ]
        );
    }

    #[test]
    fn fenced_and_prefixed_array_recovers() {
        let text = "Sure! ```json\n[{\"name\":\"A\"}]\n``` enjoy";
        let items = recover_array(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "A");
    }

    #[test]
    fn lenient_helper_turns_garbage_into_an_empty_list() {
        assert!(recover_array_or_empty("total nonsense").is_empty());
        assert!(recover_array("total nonsense").is_err());
    }

    #[test]
    fn object_block_is_outermost_not_innermost() {
        let text = "x {\"a\": {\"b\": 1}} y";
        let value = recover_object(text).unwrap();
        assert_eq!(value, json!({"a": {"b": 1}}));
    }
}
