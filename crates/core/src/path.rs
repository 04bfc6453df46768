//! Field paths
//!
//! A [`FieldPath`] addresses a location inside a document using dotted
//! notation. Segments are either keys or positional indexes:
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Object field | `status` |
//! | `a.b` | Nested field | `profile.name` |
//! | `a[n]` | Array position | `tags[0]` |
//! | `a.<id>.b` | Array element selected by identifier | `sections.5f1c….title` |
//!
//! A key segment applied to an array is an identifier selector; the
//! resolver decides that at traversal time, the parser only records keys.
//!
//! Paths are limited to [`MAX_PATH_LENGTH`] segments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{Error, Result};

/// Maximum path length in segments
pub const MAX_PATH_LENGTH: usize = 256;

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    /// Too many segments
    #[error("path length {0} exceeds maximum of {MAX_PATH_LENGTH} segments")]
    TooLong(usize),
}

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Field name, or identifier selector when applied to an array
    Key(String),
    /// Array position: `[0]`
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A path into a document
///
/// # Examples
///
/// ```
/// use docmend_core::FieldPath;
///
/// let path: FieldPath = "sections.abc.options[2]".parse().unwrap();
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.top_level(), Some("sections"));
/// assert_eq!(path.to_string(), "sections.abc.options[2]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        FieldPath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        FieldPath { segments }
    }

    /// Parse a path, mapping failures into the engine error type
    pub fn parse(s: &str) -> Result<Self> {
        s.parse().map_err(|source| Error::InvalidPath {
            path: s.to_string(),
            source,
        })
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.is_empty() {
            None
        } else {
            let mut parent = self.clone();
            parent.segments.pop();
            Some(parent)
        }
    }

    /// Get the last segment (None if root)
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Name of the final segment when it is a key
    pub fn last_key(&self) -> Option<&str> {
        match self.segments.last()? {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }

    /// Top-level field this path starts at
    ///
    /// This is the entry recorded in a dirty set for any write under the path.
    pub fn top_level(&self) -> Option<&str> {
        match self.segments.first()? {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }

    /// Path made of the first `n` segments
    pub fn prefix(&self, n: usize) -> FieldPath {
        FieldPath::from_segments(self.segments[..n.min(self.segments.len())].to_vec())
    }

    /// Convert to the dotted string representation
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                PathSegment::Key(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                PathSegment::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
            }
        }
        result
    }
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Keys may contain any character except `.`, `[` and `]`, so store
    /// identifiers and unusual field names address cleanly.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(FieldPath::root());
        }

        let mut segments = Vec::new();
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0;

        // Skip leading dot if present
        if chars[i] == '.' {
            i += 1;
            if i >= chars.len() {
                return Err(PathParseError::EmptyKey(i));
            }
        }

        while i < chars.len() {
            if chars[i] == '.' {
                i += 1;
                if i >= chars.len() || chars[i] == '.' || chars[i] == '[' {
                    return Err(PathParseError::EmptyKey(i));
                }
            }

            if chars[i] == '[' {
                let start = i;
                i += 1;
                let idx_start = i;

                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(PathParseError::UnclosedBracket(start));
                }

                let idx_str: String = chars[idx_start..i].iter().collect();
                let idx = idx_str
                    .parse::<usize>()
                    .map_err(|_| PathParseError::InvalidIndex(idx_start, idx_str))?;

                segments.push(PathSegment::Index(idx));
                i += 1;

                if i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                    return Err(PathParseError::UnexpectedChar(chars[i], i));
                }
            } else if chars[i] == ']' {
                return Err(PathParseError::UnexpectedChar(']', i));
            } else {
                let key_start = i;
                while i < chars.len() && !matches!(chars[i], '.' | '[' | ']') {
                    i += 1;
                }
                if i < chars.len() && chars[i] == ']' {
                    return Err(PathParseError::UnexpectedChar(']', i));
                }
                let key: String = chars[key_start..i].iter().collect();
                segments.push(PathSegment::Key(key));
            }

            if segments.len() > MAX_PATH_LENGTH {
                return Err(PathParseError::TooLong(segments.len()));
            }
        }

        Ok(FieldPath { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}
