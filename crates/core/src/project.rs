//! The persisted record of one completed generation.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// A completed generation kept in the project library.
///
/// Serialized as `{id, url, prompt, timestamp}` with `timestamp` in
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Opaque unique identifier.
    pub id: String,
    /// Signed URI of the generated media.
    pub url: String,
    /// The prompt as the user typed it (without directive qualifiers).
    pub prompt: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
}

impl Project {
    /// Create a project stamped with a fresh id and the current time.
    pub fn new(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            url: url.into(),
            prompt: prompt.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}
