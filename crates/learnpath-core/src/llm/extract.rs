//! JSON extraction from free-text model output
//!
//! Three ordered strategies: a fenced code block labeled as JSON, a
//! balanced-brace scan from the first opening brace, then the whole text
//! as a last resort (which typically fails parsing and feeds the retry
//! loop a useful error).

use crate::error::Result;
use regex::Regex;

/// Extract the most plausible JSON object from raw model output
pub fn extract_json(raw: &str) -> Result<String> {
    if let Some(block) = fenced_block(raw)? {
        return Ok(block);
    }

    if let Some(span) = balanced_braces(raw) {
        return Ok(span.to_string());
    }

    Ok(raw.trim().to_string())
}

/// Strategy 1: ```json fenced block (bare fences accepted too)
fn fenced_block(raw: &str) -> Result<Option<String>> {
    let re = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```")?;
    Ok(re.captures(raw).map(|c| c[1].to_string()))
}

/// Strategy 2: first top-level brace-delimited span, honoring strings and
/// escapes so braces inside values don't truncate the scan
fn balanced_braces(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let bytes = raw.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_block() {
        let raw = "Here is the plan:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_unlabeled_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_bare_object_with_surrounding_prose() {
        let raw = "Sure! {\"a\": {\"b\": 2}} hope that helps";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_braces_inside_strings_do_not_truncate() {
        let raw = r#"{"text": "a } inside", "n": 1} trailing"#;
        assert_eq!(
            extract_json(raw).unwrap(),
            r#"{"text": "a } inside", "n": 1}"#
        );
    }

    #[test]
    fn test_no_json_falls_back_to_whole_text() {
        let raw = "I cannot answer that.";
        assert_eq!(extract_json(raw).unwrap(), "I cannot answer that.");
    }

    #[test]
    fn test_unclosed_object_falls_back() {
        let raw = "{\"a\": 1";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": 1");
    }
}
