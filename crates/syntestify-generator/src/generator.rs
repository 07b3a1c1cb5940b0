//! Core Generator implementation

use crate::dedup::filter_new_contents;
use crate::error::GeneratorError;
use crate::parser::parse_completion;
use crate::prompt::PromptBuilder;
use crate::types::{GenerationOutcome, GenerationRequest};
use std::sync::{Arc, Mutex};
use syntestify_domain::traits::{CompletionProvider, TestCaseStore};
use syntestify_domain::TestCaseKind;
use tracing::{debug, info};

/// The Generator turns requirement text into persisted test cases
///
/// One linear pass per request: build the prompt, call the completion
/// provider, parse, deduplicate against the requirement's existing records,
/// insert the survivors in one batch. No retries anywhere; every failure is
/// surfaced to the caller on first occurrence.
pub struct Generator<P, S>
where
    P: CompletionProvider,
    S: TestCaseStore,
{
    provider: Arc<P>,
    store: Arc<Mutex<S>>,
}

impl<P, S> Generator<P, S>
where
    P: CompletionProvider + Send + Sync + 'static,
    S: TestCaseStore + Send + 'static,
    P::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
{
    /// Create a new Generator over a provider and a shared store handle
    pub fn new(provider: Arc<P>, store: Arc<Mutex<S>>) -> Self {
        Self { provider, store }
    }

    /// Generate, deduplicate, and persist test cases for one requirement
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GeneratorError> {
        info!(
            "Generating test cases for requirement {} ('{}')",
            request.requirement_id, request.title
        );

        let prompt = PromptBuilder::new(&request.title, &request.description).build();
        debug!("Prompt length: {} chars", prompt.len());

        let completion = self
            .provider
            .complete(&prompt)
            .await
            .map_err(|e| GeneratorError::Completion(e.to_string()))?;
        debug!("Completion length: {} chars", completion.len());

        let candidates = parse_completion(&completion);
        info!("Parsed {} test case candidates", candidates.len());

        if candidates.is_empty() {
            return Err(GeneratorError::NoTestCases);
        }

        let contents: Vec<String> = candidates.iter().map(|c| c.render()).collect();
        let candidate_count = contents.len();

        // Fetched fresh per request, never cached
        let existing = {
            let store = self.lock_store()?;
            store
                .test_case_contents(request.requirement_id)
                .map_err(|e| GeneratorError::Store(e.to_string()))?
        };

        let unique = filter_new_contents(contents, &existing);
        let duplicates_skipped = candidate_count - unique.len();

        if unique.is_empty() {
            info!(
                "No new unique test cases for requirement {}",
                request.requirement_id
            );
            return Ok(GenerationOutcome {
                test_cases: Vec::new(),
                candidates: candidate_count,
                duplicates_skipped,
            });
        }

        let inserted = {
            let mut store = self.lock_store()?;
            store
                .insert_test_cases(request.requirement_id, &unique, TestCaseKind::Generated)
                .map_err(|e| GeneratorError::Store(e.to_string()))?
        };

        info!(
            "Inserted {} generated test cases for requirement {} ({} duplicates skipped)",
            inserted.len(),
            request.requirement_id,
            duplicates_skipped
        );

        Ok(GenerationOutcome {
            test_cases: inserted.into_iter().map(|tc| tc.content).collect(),
            candidates: candidate_count,
            duplicates_skipped,
        })
    }

    fn lock_store(&self) -> Result<std::sync::MutexGuard<'_, S>, GeneratorError> {
        self.store
            .lock()
            .map_err(|e| GeneratorError::Store(format!("Store lock error: {}", e)))
    }
}
