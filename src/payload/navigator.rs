//! Read, replace and delete nodes inside JSON documents by [`FieldPath`].
//!
//! Nothing here mutates its input: `replace` and `delete` work on a copy and
//! hand back the new document. An unresolvable path is reported as `None` /
//! `found() == false`, never as an error.

use serde_json::Value;

use super::path::{FieldPath, Segment};

/// Result of [`replace`].
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// The new document (equal to the input when nothing was replaced).
    pub document: Value,
    /// The node previously at the path.
    pub previous: Option<Value>,
}

impl Replacement {
    pub fn found(&self) -> bool {
        self.previous.is_some()
    }
}

/// Result of [`delete`].
#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    pub document: Value,
    pub removed: Option<Value>,
}

impl Deletion {
    pub fn found(&self) -> bool {
        self.removed.is_some()
    }
}

fn step<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(&segment.as_key()),
        Value::Array(items) => items.get(segment.as_index()?),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(&segment.as_key()),
        Value::Array(items) => items.get_mut(segment.as_index()?),
        _ => None,
    }
}

/// Node at `path`, or `None` if any segment does not resolve.
pub fn get<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments().iter().try_fold(doc, step)
}

fn get_mut<'a>(doc: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    let mut node = doc;
    for segment in path.segments() {
        node = step_mut(node, segment)?;
    }
    Some(node)
}

/// Copy of `doc` with the node at `path` replaced by `value`.
pub fn replace(doc: &Value, path: &FieldPath, value: Value) -> Replacement {
    let mut document = doc.clone();
    let previous = get_mut(&mut document, path).map(|slot| std::mem::replace(slot, value));
    Replacement { document, previous }
}

/// Copy of `doc` without the object field at `path`.
///
/// Array elements are never removed; a path ending in an array position
/// leaves the document untouched and reports not found.
pub fn delete(doc: &Value, path: &FieldPath) -> Deletion {
    let mut document = doc.clone();
    let removed = match (path.parent(), path.last()) {
        (Some(parent), Some(last)) => match get_mut(&mut document, &parent) {
            Some(Value::Object(map)) => map.shift_remove(&last.as_key()),
            _ => None,
        },
        _ => None,
    };
    Deletion { document, removed }
}

/// True when `path` resolves to a string, number, boolean or null.
pub fn is_primitive(doc: &Value, path: &FieldPath) -> bool {
    matches!(
        get(doc, path),
        Some(Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null)
    )
}

pub fn is_object(doc: &Value, path: &FieldPath) -> bool {
    matches!(get(doc, path), Some(Value::Object(_)))
}

pub fn is_array(doc: &Value, path: &FieldPath) -> bool {
    matches!(get(doc, path), Some(Value::Array(_)))
}

/// Parse payload text; anything that is not valid JSON yields `None`.
pub fn parse_document(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Blank text, `{}` and `"{}"` all count as an empty payload.
pub fn is_empty_payload(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == "{}" || trimmed == "\"{}\""
}

/// [`get`] over raw payload text.
pub fn get_in_text(text: &str, path: &FieldPath) -> Option<Value> {
    let doc = parse_document(text)?;
    get(&doc, path).cloned()
}

/// [`replace`] over raw payload text.
///
/// Unparsable text or an unresolved path returns the original text and `None`.
pub fn replace_in_text(text: &str, path: &FieldPath, value: Value) -> (String, Option<Value>) {
    let Some(doc) = parse_document(text) else {
        return (text.to_string(), None);
    };
    let replacement = replace(&doc, path, value);
    match replacement.previous {
        Some(previous) => (replacement.document.to_string(), Some(previous)),
        None => (text.to_string(), None),
    }
}

/// [`delete`] over raw payload text.
pub fn delete_in_text(text: &str, path: &FieldPath) -> (String, Option<Value>) {
    let Some(doc) = parse_document(text) else {
        return (text.to_string(), None);
    };
    let deletion = delete(&doc, path);
    match deletion.removed {
        Some(removed) => (deletion.document.to_string(), Some(removed)),
        None => (text.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order() -> Value {
        json!({
            "order": {
                "id": 7,
                "items": [{"sku": "A-1", "qty": 2}, {"sku": "B-2", "qty": 1}],
                "note": null
            }
        })
    }

    #[test]
    fn get_walks_objects_and_arrays() {
        let doc = order();
        assert_eq!(get(&doc, &"order#items#1#sku".into()), Some(&json!("B-2")));
        assert_eq!(get(&doc, &"order#note".into()), Some(&Value::Null));
    }

    #[test]
    fn get_reports_missing_and_out_of_range() {
        let doc = order();
        assert!(get(&doc, &"order#items#5#sku".into()).is_none());
        assert!(get(&doc, &"order#id#deeper".into()).is_none());
        assert!(get(&doc, &"order#ID".into()).is_none());
        assert!(get(&doc, &"order#items#x".into()).is_none());
    }

    #[test]
    fn replace_leaves_input_untouched() {
        let doc = order();
        let result = replace(&doc, &"order#id".into(), json!("seven"));
        assert_eq!(result.previous, Some(json!(7)));
        assert_eq!(doc["order"]["id"], json!(7));
        assert_eq!(result.document["order"]["id"], json!("seven"));
    }

    #[test]
    fn delete_ignores_array_positions() {
        let doc = order();
        let result = delete(&doc, &"order#items#0".into());
        assert!(!result.found());
        assert_eq!(result.document, doc);

        let result = delete(&doc, &"order#items#0#qty".into());
        assert_eq!(result.removed, Some(json!(2)));
        assert!(result.document["order"]["items"][0].get("qty").is_none());
    }

    #[test]
    fn root_can_be_replaced_but_not_deleted() {
        let doc = json!({"a": 1});
        let replaced = replace(&doc, &FieldPath::root(), json!([1]));
        assert_eq!(replaced.document, json!([1]));
        assert!(!delete(&doc, &FieldPath::root()).found());
    }

    #[test]
    fn text_helpers_treat_garbage_as_not_found() {
        let (text, previous) = replace_in_text("{not json", &"a".into(), json!(1));
        assert_eq!(text, "{not json");
        assert!(previous.is_none());
        assert!(get_in_text("", &"a".into()).is_none());
        assert!(is_empty_payload(" \"{}\" "));
    }
}
