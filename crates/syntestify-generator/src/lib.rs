//! Syntestify Generator
//!
//! Turns requirement text into persisted test cases via a language-model
//! completion.
//!
//! # Architecture
//!
//! ```text
//! Requirement → PromptBuilder → CompletionProvider → parse_completion
//!             → filter_new_contents → TestCaseStore
//! ```
//!
//! The parsing step is a pure function over the raw completion text, so the
//! strategy (regex today, a grammar or structured-output request tomorrow)
//! can be swapped without touching orchestration. Deduplication is likewise
//! pure; the store's transactional insert backs it up under concurrency.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use syntestify_domain::{Project, Requirement};
//! use syntestify_domain::traits::TestCaseStore;
//! use syntestify_generator::{GenerationRequest, Generator};
//! use syntestify_llm::MockProvider;
//! use syntestify_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::in_memory()?;
//! let project = Project::new("Demo", "");
//! let requirement = Requirement::new(project.id, "Login", "Users can log in");
//! let request = GenerationRequest {
//!     requirement_id: requirement.id,
//!     title: requirement.title.clone(),
//!     description: requirement.description.clone(),
//! };
//! store.create_project(project)?;
//! store.create_requirement(requirement)?;
//!
//! let provider = Arc::new(MockProvider::new("- **Case**\n  1. Step"));
//! let generator = Generator::new(provider, Arc::new(Mutex::new(store)));
//!
//! let outcome = generator.generate(request).await?;
//! println!("Inserted {} test cases", outcome.test_cases.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod generator;
pub mod dedup;
pub mod parser;
pub mod prompt;
mod types;


pub use error::GeneratorError;
pub use generator::Generator;
pub use types::{GenerationOutcome, GenerationRequest, TestCaseCandidate};
