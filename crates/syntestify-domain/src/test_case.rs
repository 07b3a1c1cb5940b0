//! TestCase entity
//!
//! A test case is a single text blob: a bolded title line followed by
//! numbered step lines. Test cases are created through the generation
//! pipeline or manual authoring, deleted by id, and never mutated in place.
//!
//! Invariant: for a given requirement, no two persisted test cases have
//! byte-identical trimmed content. The store's batch insert enforces this at
//! insertion time.

use crate::project::unix_now;
use crate::{RequirementId, TestCaseId};
use serde::{Deserialize, Serialize};

/// Provenance of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseKind {
    /// Produced by the generation pipeline
    Generated,
    /// Authored by a user
    Manual,
}

impl TestCaseKind {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseKind::Generated => "generated",
            TestCaseKind::Manual => "manual",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generated" => Some(TestCaseKind::Generated),
            "manual" => Some(TestCaseKind::Manual),
            _ => None,
        }
    }
}

/// A persisted test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Unique identifier
    pub id: TestCaseId,

    /// Owning requirement
    pub requirement_id: RequirementId,

    /// Title line plus numbered step lines, e.g. `**Login succeeds**\n1. ...`
    pub content: String,

    /// Provenance tag
    pub kind: TestCaseKind,

    /// When this test case was created (unix seconds)
    pub created_at: u64,
}

impl TestCase {
    /// Create a new test case with a fresh identifier
    pub fn new(
        requirement_id: RequirementId,
        content: impl Into<String>,
        kind: TestCaseKind,
    ) -> Self {
        Self {
            id: TestCaseId::new(),
            requirement_id,
            content: content.into(),
            kind,
            created_at: unix_now(),
        }
    }
}
