//! Field-level mutation strategies applied through the navigator.

use std::fmt;

use serde_json::Value;

use super::navigator;
use super::path::FieldPath;

/// What to do with the current value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationStrategy {
    /// Swap the value for a fixed one.
    Replace(Value),
    /// Put text in front of the current value.
    Prefix(String),
    /// Append text to the current value.
    Trail(String),
    /// Insert text in the middle of the current value.
    InsertMiddle(String),
    /// Drop the field from its object.
    Remove,
    /// Leave the value alone.
    Noop,
}

impl MutationStrategy {
    /// New value for a field currently holding `old`. `None` means remove.
    pub fn apply(&self, old: &Value) -> Option<Value> {
        match self {
            Self::Replace(value) => Some(value.clone()),
            Self::Prefix(text) => Some(Value::String(format!("{}{}", text, as_text(old)))),
            Self::Trail(text) => Some(Value::String(format!("{}{}", as_text(old), text))),
            Self::InsertMiddle(text) => Some(Value::String(insert_in_middle(&as_text(old), text))),
            Self::Remove => None,
            Self::Noop => Some(old.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Replace(_) => "REPLACE",
            Self::Prefix(_) => "PREFIX",
            Self::Trail(_) => "TRAIL",
            Self::InsertMiddle(_) => "INSERT",
            Self::Remove => "REMOVE",
            Self::Noop => "NOOP",
        }
    }
}

impl fmt::Display for MutationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(value) => write!(f, "{} with {}", self.name(), value),
            Self::Prefix(text) | Self::Trail(text) | Self::InsertMiddle(text) => {
                write!(f, "{} with {:?}", self.name(), text)
            }
            Self::Remove | Self::Noop => f.write_str(self.name()),
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Insert `insert` at the middle character boundary of `base`.
pub fn insert_in_middle(base: &str, insert: &str) -> String {
    let middle = base.chars().count() / 2;
    let split = base.char_indices().nth(middle).map_or(base.len(), |(i, _)| i);
    let mut out = String::with_capacity(base.len() + insert.len());
    out.push_str(&base[..split]);
    out.push_str(insert);
    out.push_str(&base[split..]);
    out
}

/// Outcome of [`mutate_field`].
#[derive(Debug, Clone, PartialEq)]
pub struct MutatedPayload {
    pub document: Value,
    pub previous: Value,
    /// Value written at the path; `None` when the field was removed.
    pub applied: Option<Value>,
}

/// Apply `strategy` to the field at `path`. `None` when the path does not
/// resolve (or, for `Remove`, does not name an object field).
pub fn mutate_field(doc: &Value, path: &FieldPath, strategy: &MutationStrategy) -> Option<MutatedPayload> {
    let previous = navigator::get(doc, path)?;
    match strategy.apply(previous) {
        Some(value) => {
            let replacement = navigator::replace(doc, path, value.clone());
            Some(MutatedPayload {
                document: replacement.document,
                previous: replacement.previous?,
                applied: Some(value),
            })
        }
        None => {
            let deletion = navigator::delete(doc, path);
            Some(MutatedPayload {
                document: deletion.document,
                previous: deletion.removed?,
                applied: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_strategies_stringify_non_strings() {
        assert_eq!(MutationStrategy::Prefix("x".into()).apply(&json!(12)), Some(json!("x12")));
        assert_eq!(MutationStrategy::Trail("!".into()).apply(&json!("ab")), Some(json!("ab!")));
        assert_eq!(MutationStrategy::InsertMiddle("--".into()).apply(&json!("abcd")), Some(json!("ab--cd")));
    }

    #[test]
    fn insert_respects_char_boundaries() {
        assert_eq!(insert_in_middle("héllo", "X"), "héXllo");
        assert_eq!(insert_in_middle("", "X"), "X");
    }

    #[test]
    fn remove_deletes_object_field() {
        let doc = json!({"user": {"name": "ann", "age": 3}});
        let mutated = mutate_field(&doc, &"user#age".into(), &MutationStrategy::Remove).unwrap();
        assert_eq!(mutated.document, json!({"user": {"name": "ann"}}));
        assert_eq!(mutated.previous, json!(3));
        assert!(mutated.applied.is_none());
    }

    #[test]
    fn missing_path_yields_none() {
        let doc = json!({"a": 1});
        assert!(mutate_field(&doc, &"b".into(), &MutationStrategy::Noop).is_none());
    }

    #[test]
    fn display_names_the_strategy() {
        assert_eq!(MutationStrategy::Replace(json!(0)).to_string(), "REPLACE with 0");
        assert_eq!(MutationStrategy::Remove.to_string(), "REMOVE");
    }
}
