//! Document paths
//!
//! A document path has an even number of segments: collection, document,
//! collection, document, ... A collection path is the same minus the final
//! document segment, so it always has an odd number of segments.

use std::fmt;
use std::str::FromStr;

use crate::StoreError;

/// Address of a single document, e.g. `users/abc/studyPlans/plan-1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// Build a document path from its segments
    pub fn new<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let joined = segments.join("/");

        if segments.is_empty() {
            return Err(StoreError::invalid_path(joined, "path is empty"));
        }
        if segments.len() % 2 != 0 {
            return Err(StoreError::invalid_path(
                joined,
                "document paths need an even number of segments",
            ));
        }
        validate_segments(&joined, &segments)?;

        Ok(Self { segments })
    }

    /// Parse a slash-separated document path
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        Self::new(path.trim_matches('/').split('/'))
    }

    /// The document's own id (last segment)
    pub fn id(&self) -> &str {
        // Construction guarantees at least two segments
        &self.segments[self.segments.len() - 1]
    }

    /// The path of the collection holding this document
    pub fn collection(&self) -> String {
        self.segments[..self.segments.len() - 1].join("/")
    }

    /// All path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for DocPath {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validate and normalize a collection path (odd number of segments)
pub(crate) fn normalize_collection(path: &str) -> Result<String, StoreError> {
    let trimmed = path.trim_matches('/');
    let segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
    if segments.len() % 2 != 1 {
        return Err(StoreError::invalid_path(
            trimmed,
            "collection paths need an odd number of segments",
        ));
    }
    validate_segments(trimmed, &segments)?;
    Ok(segments.join("/"))
}

fn validate_segments(joined: &str, segments: &[String]) -> Result<(), StoreError> {
    for segment in segments {
        if segment.is_empty() {
            return Err(StoreError::invalid_path(joined, "empty segment"));
        }
        if segment.contains('/') {
            return Err(StoreError::invalid_path(joined, "segment contains '/'"));
        }
    }
    Ok(())
}
