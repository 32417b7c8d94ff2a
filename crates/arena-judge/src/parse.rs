//! LLM response parsing into judge verdicts.
//!
//! The LLM returns raw text (ideally a bare JSON object). This module
//! recovers the object from common formatting slips and deserializes it
//! into the lenient verdict types from `arena-types`. Missing fields take
//! their defaults; text with no recoverable JSON object is an error.

use arena_types::{ClashVerdict, Verdict};
use serde::de::DeserializeOwned;

use crate::error::JudgeError;

/// Parse a single-action judgment.
pub fn parse_verdict(raw: &str) -> Result<Verdict, JudgeError> {
    parse_lenient(raw)
}

/// Parse a simultaneous clash judgment.
pub fn parse_clash_verdict(raw: &str) -> Result<ClashVerdict, JudgeError> {
    parse_lenient(raw)
}

/// Attempt to parse the response through multiple recovery strategies:
/// 1. Direct `serde_json` deserialization
/// 2. Extract JSON from a markdown code block
/// 3. Strip trailing commas and retry
/// 4. Code block extraction followed by comma stripping
fn parse_lenient<T: DeserializeOwned>(raw: &str) -> Result<T, JudgeError> {
    let trimmed = raw.trim();

    // Strategy 1: direct parse
    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    // Strategy 2: extract from markdown code block
    if let Some(json_str) = extract_json_from_codeblock(trimmed)
        && let Ok(parsed) = serde_json::from_str::<T>(json_str)
    {
        return Ok(parsed);
    }

    // Strategy 3: strip trailing commas and retry
    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<T>(&cleaned) {
        return Ok(parsed);
    }

    // Strategy 4: extract from code block then strip commas
    if let Some(json_str) = extract_json_from_codeblock(trimmed) {
        let cleaned_inner = strip_trailing_commas(json_str);
        if let Ok(parsed) = serde_json::from_str::<T>(&cleaned_inner) {
            return Ok(parsed);
        }
    }

    Err(JudgeError::Parse(format!(
        "all parse strategies failed for: {trimmed}"
    )))
}

/// Extract JSON from a markdown code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    // Look for ```json ... ``` or ``` ... ```
    let start = text
        .find("```json")
        .map(|i| after_fence_line(text, i, 7))
        .or_else(|| text.find("```").map(|i| after_fence_line(text, i, 3)));

    let start = start?;
    let remaining = text.get(start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

/// Byte offset just past the line holding a fence that starts at `at`.
fn after_fence_line(text: &str, at: usize, tag_len: usize) -> usize {
    let after_tag = at.checked_add(tag_len).unwrap_or(at);
    text.get(after_tag..)
        .and_then(|s| s.find('\n'))
        .and_then(|nl| after_tag.checked_add(nl))
        .and_then(|pos| pos.checked_add(1))
        .unwrap_or(after_tag)
}

/// Strip trailing commas before closing braces and brackets (common LLM error).
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == ',' {
            let rest = chars.clone().find(|ch| !ch.is_whitespace());
            if matches!(rest, Some('}' | ']')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}
