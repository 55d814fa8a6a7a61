//! Response parsing (§4.2): first attempts a structured (JSON) parse by
//! locating the outermost brace-balanced object in the response text; on
//! failure, falls back to a deterministic text-extraction rule. Never
//! panics or propagates a parse error — worst case is a best-effort
//! [`Analysis`] with capped confidence.

use doc_enrich_core::{Analysis, ConfirmationVerdict};

/// Scans `text` for the first top-level `{...}` object, tracking brace
/// depth and skipping braces inside string literals so a `"note": "a {b}"`
/// field doesn't throw off the count.
pub fn extract_outermost_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        let c = b as char;
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses an analyst response into an [`Analysis`], never failing.
pub fn parse_analysis(raw: &str, reasoning_fallback_len: usize) -> Analysis {
    if let Some(obj) = extract_outermost_json_object(raw) {
        if let Ok(parsed) = serde_json::from_str::<StructuredAnalysis>(obj) {
            return Analysis {
                suggested_value: parsed.suggested_value,
                reasoning: parsed.reasoning.unwrap_or_default(),
                confidence: parsed.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
                alternatives: parsed.alternatives.unwrap_or_default(),
                attempts_used: 0,
            };
        }
    }
    let trimmed = raw.trim();
    let snippet: String = trimmed.chars().take(reasoning_fallback_len).collect();
    Analysis::best_effort(serde_json::Value::String(trimmed.to_string()), format!("unstructured response: {snippet}"))
}

/// Parses a reviewer response into a [`ConfirmationVerdict`] (§4.2).
/// Structured responses carry an explicit `confirmed` boolean; unstructured
/// ones fall back to a deterministic keyword scan over the whole (lowercased)
/// response, using `approval_keywords` from [`doc_enrich_core::ConfirmationConfig`]
/// rather than a hardcoded list.
pub fn parse_confirmation(raw: &str, approval_keywords: &[String]) -> ConfirmationVerdict {
    if let Some(obj) = extract_outermost_json_object(raw) {
        if let Ok(parsed) = serde_json::from_str::<StructuredVerdict>(obj) {
            return ConfirmationVerdict { confirmed: parsed.confirmed, feedback: parsed.feedback };
        }
    }
    let lowered = raw.trim().to_lowercase();
    let rejected = lowered.contains("reject") || lowered.starts_with("no");
    let confirmed = approval_keywords.iter().any(|kw| lowered.contains(kw.to_lowercase().as_str()));
    if confirmed && !rejected {
        ConfirmationVerdict::confirmed()
    } else {
        ConfirmationVerdict::rejected(raw.trim().to_string())
    }
}

#[derive(serde::Deserialize)]
struct StructuredAnalysis {
    suggested_value: serde_json::Value,
    reasoning: Option<String>,
    confidence: Option<f32>,
    #[serde(default)]
    alternatives: Option<Vec<serde_json::Value>>,
}

#[derive(serde::Deserialize)]
struct StructuredVerdict {
    confirmed: bool,
    #[serde(default)]
    feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_outermost_object_ignoring_nested_braces_in_strings() {
        let text = r#"Sure, here you go: {"suggested_value": "a {weird} title", "confidence": 0.9} trailing text"#;
        let obj = extract_outermost_json_object(text).unwrap();
        assert_eq!(obj, r#"{"suggested_value": "a {weird} title", "confidence": 0.9}"#);
    }

    #[test]
    fn falls_back_to_best_effort_on_malformed_json() {
        let analysis = parse_analysis("not json at all, just prose", 40);
        assert!(analysis.confidence <= 0.5);
    }

    fn default_keywords() -> Vec<String> {
        vec!["confirm".to_string(), "accept".to_string(), "yes".to_string()]
    }

    #[test]
    fn parses_structured_confirmation() {
        let verdict = parse_confirmation(r#"{"confirmed": true}"#, &default_keywords());
        assert!(verdict.confirmed);
    }

    #[test]
    fn falls_back_to_keyword_scan_for_confirmation() {
        let verdict = parse_confirmation("No, this correspondent name looks wrong.", &default_keywords());
        assert!(!verdict.confirmed);
        assert!(verdict.feedback.is_some());
    }

    #[test]
    fn keyword_scan_matches_accept_anywhere_in_the_response() {
        let verdict = parse_confirmation("Accepted — looks right.", &default_keywords());
        assert!(verdict.confirmed);
    }

    #[test]
    fn keyword_scan_is_not_limited_to_the_first_line() {
        let verdict = parse_confirmation("Let me think about this.\nYes, confirm it.", &default_keywords());
        assert!(verdict.confirmed);
    }
}
