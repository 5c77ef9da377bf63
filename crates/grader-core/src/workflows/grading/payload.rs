use super::domain::RawPayload;
use serde_json::Value;

/// Turns whatever the transport returned into a JSON value without failing.
///
/// Structured input passes through untouched. Text is parsed as JSON once
/// stray byte-order marks and surrounding whitespace are ignored; text that
/// still does not parse is carried verbatim as a JSON string, which the
/// classifier always reads as a recognition result.
pub fn normalize(payload: RawPayload) -> Value {
    match payload {
        RawPayload::Structured(value) => value,
        RawPayload::Text(text) => match serde_json::from_str::<Value>(strip_noise(&text)) {
            Ok(value) => value,
            Err(_) => Value::String(text),
        },
    }
}

/// Drops byte-order marks, zero-width spaces and whitespace around a body.
pub(crate) fn strip_noise(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\u{feff}' || c == '\u{200b}' || c.is_whitespace())
}
