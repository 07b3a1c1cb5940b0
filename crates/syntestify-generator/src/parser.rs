//! Parse completion text into test-case candidates
//!
//! This is a best-effort parse of the Markdown-ish shape the prompt asks
//! for: a list of blocks, each opened by `- **Title**` and followed by
//! numbered steps. Blocks that do not match the shape are dropped; the
//! caller decides what an empty result means.

use crate::types::TestCaseCandidate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Boundary preceding each bolded title: start of text or a newline, a list
/// hyphen, whitespace, then the opening bold marker
static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)-\s+\*\*").unwrap());

/// Block shape: title text on one line, the closing bold marker, a newline,
/// then everything else as steps
static BLOCK_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\*\*\n(?s:(.*))$").unwrap());

/// Leading `Test Case` label, optionally with a colon, a number, and more
/// colon/space
static TITLE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^test case\s*:?\s*\d*\s*:?\s*").unwrap());

/// Leading `**Test Case N**` bold label
static TITLE_BOLD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*\*test case \d+\*\*\s*").unwrap());

/// Stray leading bold marker
static TITLE_BOLD_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*").unwrap());

/// Parse raw completion text into test-case candidates
///
/// Never errors: input with no recognizable blocks yields an empty vector.
pub fn parse_completion(text: &str) -> Vec<TestCaseCandidate> {
    BLOCK_SEPARATOR
        .split(text)
        .filter(|block| !block.is_empty())
        .filter_map(parse_block)
        .collect()
}

/// Parse one block into a candidate, or drop it when it lacks the
/// title-delimiter shape
fn parse_block(block: &str) -> Option<TestCaseCandidate> {
    let Some(caps) = BLOCK_SHAPE.captures(block) else {
        debug!("Dropping block without bold-title shape: {:?}", truncate(block));
        return None;
    };

    let title = normalize_title(&caps[1]);
    let steps = normalize_steps(&caps[2]);

    Some(TestCaseCandidate { title, steps })
}

/// Strip label prefixes and bold markers from a title and trim it
///
/// Idempotent for titles it has already normalized.
pub fn normalize_title(raw: &str) -> String {
    let title = raw.trim();
    let title = TITLE_LABEL.replace(title, "");
    let title = TITLE_BOLD_LABEL.replace(&title, "");
    let title = TITLE_BOLD_MARKER.replace(&title, "");
    title.trim().to_string()
}

/// Trim the steps text; each line is trimmed individually so indented
/// provider output renders as flush numbered steps
fn normalize_steps(raw: &str) -> String {
    raw.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(block: &str) -> &str {
    let end = block
        .char_indices()
        .nth(80)
        .map(|(i, _)| i)
        .unwrap_or(block.len());
    &block[..end]
}
