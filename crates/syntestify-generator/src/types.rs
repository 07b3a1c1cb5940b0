//! Request and response types for generation

use syntestify_domain::RequirementId;

/// Request to generate test cases for one requirement
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The requirement the generated test cases will belong to
    pub requirement_id: RequirementId,

    /// Requirement title, embedded verbatim in the prompt
    pub title: String,

    /// Requirement description, embedded verbatim in the prompt
    pub description: String,
}

/// Result of a generation operation
///
/// An empty `test_cases` with a nonzero `candidates` count means every
/// candidate already existed for the requirement; callers report this as a
/// no-op success, not an error.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Content of the test cases actually inserted, in insertion order
    pub test_cases: Vec<String>,

    /// How many candidates the completion parsed into
    pub candidates: usize,

    /// How many candidates were dropped as duplicates of existing records
    pub duplicates_skipped: usize,
}

/// A single test case parsed out of a completion
///
/// `title` has been normalized (label and bold markers stripped, trimmed);
/// `steps` holds the remaining lines, each trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseCandidate {
    /// Normalized scenario title
    pub title: String,

    /// Step lines, newline-joined
    pub steps: String,
}

impl TestCaseCandidate {
    /// Render in the persisted shape: `**<title>**\n<steps>`
    pub fn render(&self) -> String {
        format!("**{}**\n{}", self.title, self.steps)
    }
}
