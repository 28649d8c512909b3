/// Identity key types for Ripple Player entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity key for a queue entry.
///
/// A remote item is identified by its platform id. A part of a multi-part
/// item is only unique together with its part id, so the part id is included
/// in equality and hashing; a single-part item's identity is its primary id
/// alone. Local files carry a generated primary id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    /// Platform item id, or a generated id for local files
    primary: String,

    /// Part id for parts of multi-part items
    part: Option<String>,
}

impl TrackKey {
    /// Create a key for a single-part item
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            part: None,
        }
    }

    /// Create a key for one part of a multi-part item
    pub fn with_part(primary: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            part: Some(part.into()),
        }
    }

    /// Generate a key for a local file
    pub fn local() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// The platform item id
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// The part id, if this key addresses one part of a multi-part item
    pub fn part(&self) -> Option<&str> {
        self.part.as_deref()
    }

    /// Whether this key belongs to the given platform item, any part
    pub fn matches_primary(&self, primary: &str) -> bool {
        self.primary == primary
    }

    /// Whether this key addresses the given part
    pub fn matches_part(&self, part: &str) -> bool {
        self.part.as_deref() == Some(part)
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.part {
            Some(part) => write!(f, "{}/{}", self.primary, part),
            None => write!(f, "{}", self.primary),
        }
    }
}
