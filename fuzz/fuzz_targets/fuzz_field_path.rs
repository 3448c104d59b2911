//! Fuzz target for path parsing and navigation.
//!
//! Arbitrary paths over arbitrary payload text must never panic, and a
//! successful replace must read back through `get`.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use probe_core::payload::navigator::{delete, get, parse_document, replace};
use probe_core::payload::{is_cyclic, list_field_paths, FieldPath};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    document: &'a str,
    path: &'a str,
    max_repeats: u8,
}

fuzz_target!(|input: Input<'_>| {
    let path = FieldPath::parse(input.path);
    let _ = is_cyclic(&path.labels(), usize::from(input.max_repeats));

    let Some(doc) = parse_document(input.document) else {
        return;
    };
    let marker = serde_json::json!("fuzz-marker");
    let replaced = replace(&doc, &path, marker.clone());
    if replaced.found() {
        assert_eq!(get(&replaced.document, &path), Some(&marker));
    } else {
        assert_eq!(replaced.document, doc);
    }
    let _ = delete(&doc, &path);

    for field in list_field_paths(&doc).take(1024) {
        assert!(get(&doc, &field).is_some());
    }
});
