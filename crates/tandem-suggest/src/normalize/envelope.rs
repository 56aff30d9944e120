//! Answer extraction from vendor response envelopes.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Vendor envelope shapes the normalizer understands.
///
/// Variant order matters: a body carrying an `error` member is an error even
/// if it also carries choices.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Error { error: VendorError },
    Chat { choices: Vec<ChatChoice> },
    Gemini { candidates: Vec<GeminiCandidate> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VendorError {
    Detailed {
        #[serde(default)]
        message: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

impl Envelope {
    /// Decode `raw` as an envelope. Only JSON objects are considered.
    fn decode(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// Chat content is either a string or a list of typed parts.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(""),
        ),
        _ => None,
    }
}

/// Extract the model's answer text from a raw response body.
///
/// A body that is not a recognized envelope is taken as the answer itself.
/// Error envelopes and envelopes without answer text yield `None`.
pub fn extract_answer(raw: &str) -> Option<String> {
    let answer = match Envelope::decode(raw) {
        Some(Envelope::Error { error }) => {
            let message = match error {
                VendorError::Detailed { message } => message.unwrap_or_default(),
                VendorError::Text(text) => text,
            };
            warn!(error = %message, "Response carries a vendor error envelope");
            return None;
        }
        Some(Envelope::Chat { choices }) => choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .and_then(|content| content_text(&content)),
        Some(Envelope::Gemini { candidates }) => candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            }),
        None => {
            debug!(response_len = raw.len(), "Response is not an envelope, using it as the answer");
            Some(raw.to_string())
        }
    };

    let answer = answer.filter(|a| !a.trim().is_empty());
    if answer.is_none() {
        warn!(response_len = raw.len(), "Envelope carries no answer text");
    }
    answer
}

/// Remove a markdown code fence around the payload.
///
/// Handles fences with or without a language tag and fences embedded in
/// surrounding prose. Text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };

    let after = &trimmed[open + 3..];
    let tag_len = after
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    let body = &after[tag_len..];

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_openai_content() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "[1]"}}]}"#;
        assert_eq!(extract_answer(raw).as_deref(), Some("[1]"));
    }

    #[test]
    fn test_extract_openai_content_parts() {
        let raw = r#"{"choices": [{"message": {"content": [{"type": "text", "text": "[{"}, {"type": "text", "text": "}]"}]}}]}"#;
        assert_eq!(extract_answer(raw).as_deref(), Some("[{}]"));
    }

    #[test]
    fn test_extract_gemini_parts() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "[{\"title\": "}, {"text": "\"x\"}]"}]}}]}"#;
        assert_eq!(extract_answer(raw).as_deref(), Some(r#"[{"title": "x"}]"#));
    }

    #[test]
    fn test_error_envelope_yields_none() {
        assert!(extract_answer(r#"{"error": {"message": "quota"}}"#).is_none());
        assert!(extract_answer(r#"{"error": "quota"}"#).is_none());
        assert!(extract_answer(r#"{"error": {"message": "x"}, "choices": []}"#).is_none());
    }

    #[test]
    fn test_envelope_without_answer_yields_none() {
        assert!(extract_answer(r#"{"choices": []}"#).is_none());
        assert!(extract_answer(r#"{"choices": [{"message": {"content": null}}]}"#).is_none());
        assert!(extract_answer(r#"{"candidates": []}"#).is_none());
        assert!(extract_answer(r#"{"choices": [{"message": {"content": "  "}}]}"#).is_none());
    }

    #[test]
    fn test_bare_text_is_the_answer() {
        let raw = r#"[{"title": "Picnic"}]"#;
        assert_eq!(extract_answer(raw).as_deref(), Some(raw));

        let raw = r#"{"title": "Picnic"}"#;
        assert_eq!(extract_answer(raw).as_deref(), Some(raw));

        assert_eq!(extract_answer("Sure! Here you go").as_deref(), Some("Sure! Here you go"));
    }

    #[test]
    fn test_strip_code_fences_json_tag() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_strip_code_fences_bare_fence() {
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```[1]```"), "[1]");
    }

    #[test]
    fn test_strip_code_fences_inside_prose() {
        let text = "Here are your ideas:\n```json\n[{\"a\": 1}]\n```\nEnjoy!";
        assert_eq!(strip_code_fences(text), "[{\"a\": 1}]");
    }

    #[test]
    fn test_strip_code_fences_unterminated() {
        assert_eq!(strip_code_fences("```json\n[1]"), "[1]");
    }

    #[test]
    fn test_strip_code_fences_no_fence() {
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }
}
