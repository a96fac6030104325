//! Resilient structured-response parser.
//!
//! The extraction service is asked to answer with two marked sections:
//!
//! ```text
//! ### PHYSICAL_LAYOUT_RECONSTRUCTION
//! <markdown table approximating the document layout>
//! ### STRUCTURED_DATABASE_JSON
//! <JSON payload>
//! ```
//!
//! Real responses drift from that shape. The parser runs an ordered recovery
//! ladder, each stage idempotent and independently testable:
//!
//! 1. section split (whole response becomes the JSON candidate when the
//!    marker is missing)
//! 2. markdown fence strip
//! 3. trailing-comma repair before `}` / `]`
//! 4. strict parse of the greedy brace substring (first `{` to last `}`)
//! 5. strict parse of the whole repaired string
//! 6. raw wrap under a `RECOVERED` status
//!
//! The ladder never fails and never panics: the caller always receives a
//! well-formed [`ParsedResult`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Placeholder emitted when the layout-table marker is absent.
const TABLE_NOT_FOUND: &str = "NOT_FOUND";

/// Table section: everything after the marker, up to the next `###` heading
/// or end of string.
static TABLE_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)###\s*PHYSICAL_LAYOUT_RECONSTRUCTION\s*(.*?)(?:###|$)")
        .expect("pattern is compile-time constant")
});

/// JSON section: same shape, different marker.
static JSON_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)###\s*STRUCTURED_DATABASE_JSON\s*(.*?)(?:###|$)")
        .expect("pattern is compile-time constant")
});

/// Markdown fence tokens, with or without a language tag.
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[a-zA-Z]*").expect("pattern is compile-time constant"));

/// Trailing comma immediately before a closing brace or bracket.
static TRAILING_COMMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("pattern is compile-time constant"));

/// Outcome of a parse attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseStatus {
    /// Clean parse of the JSON section
    #[default]
    Success,
    /// No repair stage produced valid JSON; the raw text is wrapped instead
    Recovered,
    /// An upstream stage (recognition or extraction) failed before parsing
    Error,
}

/// The terminal artifact of the pipeline: layout table plus structured data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResult {
    /// Layout-table section of the response (or `"NOT_FOUND"`)
    pub table_section: String,
    /// Parsed JSON payload, or the recovery wrapper
    pub structured_data: Value,
    /// How the payload was obtained
    pub status: ParseStatus,
}

/// Parse a free-text extraction response. Never fails.
///
/// Malformed input degrades to a [`ParseStatus::Recovered`] result wrapping
/// the repaired raw text under `"unstructured_content"`.
#[must_use = "returns the parsed result"]
pub fn parse_response(response: &str) -> ParsedResult {
    let table_section = extract_table_section(response);
    let json_candidate = extract_json_section(response);

    let repaired = repair_trailing_commas(&strip_fences(&json_candidate));

    if let Some(value) = parse_brace_substring(&repaired).or_else(|| parse_strict(&repaired)) {
        return ParsedResult {
            table_section,
            structured_data: value,
            status: ParseStatus::Success,
        };
    }

    debug!(
        len = repaired.len(),
        "no parse stage produced valid JSON, wrapping raw text"
    );

    ParsedResult {
        table_section,
        structured_data: json!({ "unstructured_content": repaired }),
        status: ParseStatus::Recovered,
    }
}

/// Pull the layout-table section out of the response, or the placeholder.
#[must_use = "returns the table section text"]
pub fn extract_table_section(response: &str) -> String {
    TABLE_SECTION_RE
        .captures(response)
        .and_then(|c| c.get(1))
        .map_or_else(|| TABLE_NOT_FOUND.to_string(), |m| m.as_str().trim().to_string())
}

/// Pull the JSON section out of the response.
///
/// When the marker is absent the entire response is the candidate - the
/// service frequently answers with bare JSON and no headings.
#[must_use = "returns the JSON candidate text"]
pub fn extract_json_section(response: &str) -> String {
    JSON_SECTION_RE
        .captures(response)
        .and_then(|c| c.get(1))
        .map_or_else(|| response.trim().to_string(), |m| m.as_str().trim().to_string())
}

/// Remove markdown code-fence tokens (```json, ```, and friends).
#[must_use = "returns the text without fence tokens"]
pub fn strip_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Drop trailing commas sitting immediately before `}` or `]`.
#[must_use = "returns the repaired text"]
pub fn repair_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_RE.replace_all(text, "$1").into_owned()
}

/// Parse the greedy brace-delimited substring (first `{` to last `}`).
#[must_use = "returns the parsed value when the substring is valid JSON"]
pub fn parse_brace_substring(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn parse_strict(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response_with_sections() {
        // Scenario: both sections present, fenced JSON with a trailing comma.
        let response = "### PHYSICAL_LAYOUT_RECONSTRUCTION\n|A|B|\n### STRUCTURED_DATABASE_JSON\n```json\n{\"name\": \"Jo\",}\n```";
        let result = parse_response(response);
        assert_eq!(result.table_section, "|A|B|");
        assert_eq!(result.structured_data, json!({"name": "Jo"}));
        assert_eq!(result.status, ParseStatus::Success);
    }

    #[test]
    fn test_prose_with_no_json_recovers() {
        let result = parse_response("I could not read the document, sorry.");
        assert_eq!(result.status, ParseStatus::Recovered);
        assert_eq!(result.table_section, "NOT_FOUND");
        assert_eq!(
            result.structured_data["unstructured_content"],
            "I could not read the document, sorry."
        );
    }

    #[test]
    fn test_empty_response_recovers() {
        let result = parse_response("");
        assert_eq!(result.status, ParseStatus::Recovered);
    }

    #[test]
    fn test_bare_json_without_markers() {
        let result = parse_response("{\"policy_number\": \"A-42\"}");
        assert_eq!(result.status, ParseStatus::Success);
        assert_eq!(result.structured_data["policy_number"], "A-42");
        assert_eq!(result.table_section, "NOT_FOUND");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let result = parse_response("Here is the data: {\"a\": 1} hope it helps");
        assert_eq!(result.status, ParseStatus::Success);
        assert_eq!(result.structured_data, json!({"a": 1}));
    }

    #[test]
    fn test_unbalanced_braces_recover() {
        let result = parse_response("{\"a\": {\"b\": 1}");
        assert_eq!(result.status, ParseStatus::Recovered);
    }

    #[test]
    fn test_markers_case_insensitive() {
        let response =
            "### physical_layout_reconstruction\ntable here\n### structured_database_json\n{}";
        let result = parse_response(response);
        assert_eq!(result.table_section, "table here");
        assert_eq!(result.status, ParseStatus::Success);
    }

    #[test]
    fn test_trailing_comma_in_array() {
        let result = parse_response("{\"items\": [1, 2, 3,]}");
        assert_eq!(result.status, ParseStatus::Success);
        assert_eq!(result.structured_data, json!({"items": [1, 2, 3]}));
    }

    #[test]
    fn test_strip_fences_idempotent() {
        let input = "```json\n{\"a\": 1}\n```";
        let once = strip_fences(input);
        assert_eq!(strip_fences(&once), once);
        assert_eq!(once, "{\"a\": 1}");
    }

    #[test]
    fn test_repair_trailing_commas_idempotent() {
        let input = "{\"a\": [1,], \"b\": 2,}";
        let once = repair_trailing_commas(input);
        assert_eq!(repair_trailing_commas(&once), once);
        assert_eq!(once, "{\"a\": [1], \"b\": 2}");
    }

    #[test]
    fn test_repair_leaves_valid_json_alone() {
        let input = "{\"a\": \"text, with commas\"}";
        assert_eq!(repair_trailing_commas(input), input);
    }

    #[test]
    fn test_section_split_idempotent() {
        let response = "### STRUCTURED_DATABASE_JSON\n{\"a\": 1}";
        let once = extract_json_section(response);
        // A bare section (marker stripped) passes through unchanged.
        assert_eq!(extract_json_section(&once), once);
    }

    #[test]
    fn test_brace_substring_greedy() {
        // First { to last }: picks up the whole object, not an inner one.
        let value = parse_brace_substring("x {\"a\": {\"b\": 2}} y").unwrap();
        assert_eq!(value, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&ParseStatus::Recovered).unwrap(),
            "\"RECOVERED\""
        );
        assert_eq!(
            serde_json::to_string(&ParseStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
    }
}
