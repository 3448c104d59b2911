//! Lazy enumeration of field paths in a document.

use serde_json::Value;

use super::path::FieldPath;

struct Frame<'a> {
    path: FieldPath,
    node: &'a Value,
    emit: bool,
}

/// Depth-first, pre-order walk over every object field of a document.
///
/// Intermediate and leaf fields are both yielded. Array elements are walked
/// with index segments but are not yielded themselves. The iterator is finite
/// and single-pass.
pub struct FieldPaths<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> FieldPaths<'a> {
    fn new(doc: &'a Value) -> Self {
        Self {
            stack: vec![Frame { path: FieldPath::root(), node: doc, emit: false }],
        }
    }

    fn expand(&mut self, path: &FieldPath, node: &'a Value) {
        match node {
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    self.stack.push(Frame { path: path.child_key(key.clone()), node: child, emit: true });
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    self.stack.push(Frame { path: path.child_index(index), node: child, emit: false });
                }
            }
            _ => {}
        }
    }
}

impl Iterator for FieldPaths<'_> {
    type Item = FieldPath;

    fn next(&mut self) -> Option<FieldPath> {
        while let Some(frame) = self.stack.pop() {
            self.expand(&frame.path, frame.node);
            if frame.emit {
                return Some(frame.path);
            }
        }
        None
    }
}

/// Every field path in `doc`, lazily.
pub fn list_field_paths(doc: &Value) -> FieldPaths<'_> {
    FieldPaths::new(doc)
}

/// Dotted names (`a.b[0].c`) of every field in `doc`.
pub fn list_field_names(doc: &Value) -> Vec<String> {
    list_field_paths(doc).map(|path| path.to_dotted()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yields_intermediate_and_leaf_fields() {
        let doc = json!({"a": {"b": 1, "c": [{"d": true}, {"d": false}]}, "e": "x"});
        let names = list_field_names(&doc);
        assert_eq!(names, vec!["a", "a.b", "a.c", "a.c[0].d", "a.c[1].d", "e"]);
    }

    #[test]
    fn primitive_and_empty_documents_have_no_fields() {
        assert_eq!(list_field_paths(&json!({})).count(), 0);
        assert_eq!(list_field_paths(&json!(42)).count(), 0);
        assert_eq!(list_field_paths(&json!([])).count(), 0);
    }

    #[test]
    fn root_array_elements_are_indexed() {
        let doc = json!([{"id": 1}, {"id": 2}]);
        let paths: Vec<String> = list_field_paths(&doc).map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["0#id", "1#id"]);
    }
}
