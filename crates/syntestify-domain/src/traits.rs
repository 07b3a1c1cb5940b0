//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Infrastructure implementations live in other crates
//! (`syntestify-store`, `syntestify-llm`).

use crate::{Project, ProjectId, Requirement, RequirementId, TestCase, TestCaseId, TestCaseKind};
use async_trait::async_trait;

/// Trait for the persistence gateway
///
/// Implemented by the infrastructure layer (`syntestify-store`)
pub trait TestCaseStore {
    /// Error type for store operations
    type Error;

    /// Create a project
    fn create_project(&mut self, project: Project) -> Result<(), Self::Error>;

    /// Get a project by id
    fn get_project(&self, id: ProjectId) -> Result<Option<Project>, Self::Error>;

    /// List all projects, oldest first
    fn list_projects(&self) -> Result<Vec<Project>, Self::Error>;

    /// Delete a project (and its requirements and test cases) by id
    fn delete_project(&mut self, id: ProjectId) -> Result<(), Self::Error>;

    /// Create a requirement
    fn create_requirement(&mut self, requirement: Requirement) -> Result<(), Self::Error>;

    /// Get a requirement by id
    fn get_requirement(&self, id: RequirementId) -> Result<Option<Requirement>, Self::Error>;

    /// List a project's requirements, oldest first
    fn list_requirements(&self, project: ProjectId) -> Result<Vec<Requirement>, Self::Error>;

    /// Update a requirement's title and description; returns false when the
    /// requirement does not exist
    fn update_requirement(
        &mut self,
        id: RequirementId,
        title: &str,
        description: &str,
    ) -> Result<bool, Self::Error>;

    /// Delete a requirement (and its test cases) by id
    fn delete_requirement(&mut self, id: RequirementId) -> Result<(), Self::Error>;

    /// Insert a batch of test cases for a requirement, skipping any whose
    /// trimmed content already exists for that requirement. Returns the rows
    /// actually inserted.
    fn insert_test_cases(
        &mut self,
        requirement: RequirementId,
        contents: &[String],
        kind: TestCaseKind,
    ) -> Result<Vec<TestCase>, Self::Error>;

    /// List a requirement's test cases, oldest first
    fn list_test_cases(&self, requirement: RequirementId) -> Result<Vec<TestCase>, Self::Error>;

    /// Fetch just the content column of a requirement's test cases
    fn test_case_contents(&self, requirement: RequirementId) -> Result<Vec<String>, Self::Error>;

    /// Delete a test case by id. Deleting an absent id is a no-op.
    fn delete_test_case(&mut self, id: TestCaseId) -> Result<(), Self::Error>;
}

/// Trait for language-model completion providers
///
/// Implemented by the infrastructure layer (`syntestify-llm`)
#[async_trait]
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error;

    /// Send one prompt to the completion endpoint and return the raw text
    async fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}
