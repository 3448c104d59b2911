//! Segmented addresses into JSON documents.
//!
//! The flat text form joins segments with `#` (`order#items#0#sku`). Field
//! enumeration renders the dotted form instead (`order.items[0].sku`).
//! Field names containing `#` cannot be expressed in the flat form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator used by the flat text encoding.
pub const PATH_SEPARATOR: char = '#';

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// Object field name. A decimal key also addresses an array element.
    Key(String),
    /// Array position. Also addresses an object key spelled with the same digits.
    Index(usize),
}

impl Segment {
    /// Field name this segment selects inside an object.
    pub fn as_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    /// Array position this segment selects, if it has one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Key(key) => parse_index(key),
            Self::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Strict non-negative decimal: no sign, no whitespace, no empty string.
fn parse_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Ordered segments addressing at most one node in a document.
///
/// The empty path addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse the flat `#` form. Never fails; empty pieces are kept as empty keys.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::root();
        }
        let segments = text
            .split(PATH_SEPARATOR)
            .map(|piece| Segment::Key(piece.to_string()))
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Path of the containing node, or `None` for the root.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.is_root() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// New path one object field deeper.
    pub fn child_key(&self, key: impl Into<String>) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.into()));
        Self { segments }
    }

    /// New path one array element deeper.
    pub fn child_index(&self, index: usize) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Render as `a.b[0].c`.
    pub fn to_dotted(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
            }
        }
        out
    }

    /// Segment texts, as fed to cycle detection.
    pub fn labels(&self) -> Vec<String> {
        self.segments.iter().map(Segment::as_key).collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
