//! Fuzz target for depth-bounded rendering.
//!
//! Any parsed document at any depth must render without panicking, and the
//! output must itself be valid JSON unless it is empty.

#![no_main]

use libfuzzer_sys::fuzz_target;
use probe_core::report::to_bounded_string;

fuzz_target!(|data: &[u8]| {
    let Some((&depth, text)) = data.split_first() else {
        return;
    };
    let Ok(doc) = serde_json::from_slice::<serde_json::Value>(text) else {
        return;
    };
    let rendered = to_bounded_string(&doc, usize::from(depth % 32));
    if !rendered.is_empty() {
        assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
    }
});
