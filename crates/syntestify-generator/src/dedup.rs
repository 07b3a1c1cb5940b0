//! Duplicate filtering for freshly generated test cases
//!
//! Comparison is exact string equality after trimming surrounding
//! whitespace. Internal whitespace, case, and punctuation are compared
//! byte-for-byte.

use std::collections::HashSet;

/// Keep the candidates whose trimmed content is not present, exact-match,
/// in the existing set
///
/// Pure function: the same inputs always yield the same output.
pub fn filter_new_contents(candidates: Vec<String>, existing: &[String]) -> Vec<String> {
    let existing: HashSet<&str> = existing.iter().map(|c| c.trim()).collect();
    candidates
        .into_iter()
        .filter(|candidate| !existing.contains(candidate.trim()))
        .collect()
}
