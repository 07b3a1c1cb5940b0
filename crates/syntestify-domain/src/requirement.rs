//! Requirement entity
//!
//! A requirement is created and edited by user actions and deleted
//! explicitly. Test-case generation reads a requirement but never mutates
//! it.

use crate::project::unix_now;
use crate::{ProjectId, RequirementId};
use serde::{Deserialize, Serialize};

/// A titled, free-text software requirement belonging to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Unique identifier
    pub id: RequirementId,

    /// Owning project
    pub project_id: ProjectId,

    /// Short display title
    pub title: String,

    /// Free-text description of the required behavior
    pub description: String,

    /// When this requirement was created (unix seconds)
    pub created_at: u64,
}

impl Requirement {
    /// Create a new requirement with a fresh identifier
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: RequirementId::new(),
            project_id,
            title: title.into(),
            description: description.into(),
            created_at: unix_now(),
        }
    }
}
