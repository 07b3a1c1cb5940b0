//! Project entity - the top-level container for requirements

use crate::ProjectId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A project groups related requirements together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,

    /// Short display title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// When this project was created (unix seconds)
    pub created_at: u64,
}

impl Project {
    /// Create a new project with a fresh identifier
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            title: title.into(),
            description: description.into(),
            created_at: unix_now(),
        }
    }
}

/// Current unix timestamp in seconds
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
