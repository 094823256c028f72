//! Model reply parsing.
//!
//! JSON mode is requested, but replies still arrive wrapped in prose or
//! markdown fences often enough that parsing is two-stage: try the whole
//! reply, then scan for the first balanced top-level JSON object.

use edurag_core::error::{EduragError, Result};
use serde_json::Value;

/// Extract a JSON object from a model reply.
pub fn extract_json_object(reply: &str) -> Result<Value> {
    let trimmed = reply.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Ok(value);
        }
    }

    if let Some(candidate) = find_balanced_object(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    Err(EduragError::MalformedReply {
        reason: "no JSON object found in model reply".to_string(),
    })
}

/// Find the first balanced `{...}` span, tracking string literals and
/// escapes so braces inside quoted text don't miscount.
fn find_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
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
    fn test_clean_json_parses() {
        let value = extract_json_object(r#"{"score": {"total": 80}}"#).unwrap();
        assert_eq!(value["score"]["total"], 80);
    }

    #[test]
    fn test_fenced_json_parses() {
        let reply = "Here is the result:\n```json\n{\"a\": 1}\n```\nDone.";
        let value = extract_json_object(reply).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let reply = r#"prefix {"note": "uses { and } freely", "n": 2} suffix"#;
        let value = extract_json_object(reply).unwrap();
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn test_hebrew_content_parses() {
        let reply = r#"{"הערה": "תשובה טובה"}"#;
        let value = extract_json_object(reply).unwrap();
        assert_eq!(value["הערה"], "תשובה טובה");
    }

    #[test]
    fn test_no_object_is_error() {
        assert!(extract_json_object("just prose, no json").is_err());
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("{\"unterminated\": ").is_err());
    }
}
