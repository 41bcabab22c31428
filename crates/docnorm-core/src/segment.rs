//! The atomic output unit of every extractor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// One logical chunk of text from a source document.
///
/// Segments carry no identity beyond their position in the sequence an
/// extractor returns; that order always follows document or temporal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Segment(String);

impl Segment {
    /// Create a new segment.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the segment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the segment, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Segment {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Segment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> Self {
        segment.0
    }
}

impl PartialEq<str> for Segment {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Segment {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Convert a sequence of segments into plain strings.
pub fn into_strings(segments: Vec<Segment>) -> Vec<String> {
    segments.into_iter().map(Segment::into_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_compares_with_str() {
        let segment = Segment::new("Hello");
        assert_eq!(segment, "Hello");
        assert_eq!(segment.len(), 5);
    }

    #[test]
    fn test_segment_serializes_as_plain_string() {
        let segments = vec![Segment::from("a"), Segment::from("b\nc")];
        let json = serde_json::to_string(&segments).unwrap();
        assert_eq!(json, r#"["a","b\nc"]"#);
    }
}
