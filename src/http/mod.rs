//! HTTP vocabulary shared by scenarios and dispatchers.
//!
//! Plain data only; no client or framework types cross this boundary.

pub mod family;
mod headers;
mod method;

pub use family::{family_of, is_2xx, is_4xx, is_5xx, matches_code_or_range, ResponseFamily};
pub use headers::Headers;
pub use method::HttpMethod;
