//! JSON payload handling for fuzzing strategies.
//!
//! Path addressing, navigation, field enumeration, mutation and cycle
//! detection. Everything here is pure and safe to call concurrently.

pub mod cyclic;
mod fields;
pub mod mutation;
pub mod navigator;
mod path;

pub use cyclic::{is_cyclic, is_cyclic_path, CyclicGuard, VisitChain};
pub use fields::{list_field_names, list_field_paths, FieldPaths};
pub use mutation::{mutate_field, MutatedPayload, MutationStrategy};
pub use navigator::{Deletion, Replacement};
pub use path::{FieldPath, Segment, PATH_SEPARATOR};
