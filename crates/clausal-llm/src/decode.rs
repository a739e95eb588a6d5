//! Decode raw provider text into JSON

use crate::LlmError;
use serde_json::Value;

/// Decode a provider's raw text payload into a JSON value
///
/// LLMs sometimes wrap JSON in markdown code blocks; a surrounding fence is
/// stripped before parsing. The value is not schema-validated here.
///
/// # Errors
///
/// - `LlmError::EmptyResponse` if there is nothing to decode
/// - `LlmError::InvalidResponse` if the payload is not JSON
pub fn decode_json(raw: &str) -> Result<Value, LlmError> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Response is not valid JSON: {}", e)))
}

/// Remove a surrounding ```json / ``` fence, if any
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }

    // Skip the opening line (``` or ```json)
    let inner = match text.find('\n') {
        Some(idx) => &text[idx + 1..],
        None => return "",
    };

    inner
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(inner)
        .trim()
}
