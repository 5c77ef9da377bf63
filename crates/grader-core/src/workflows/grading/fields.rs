use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Present and not `null`.
pub(crate) fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|field| !field.is_null())
}

/// Reads scalars as text; blanks, `null`, arrays and objects read as absent.
pub(crate) fn text(value: &Value, key: &str) -> Option<String> {
    present(value, key).and_then(scalar_text)
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    Some(rendered).filter(|text| !text.is_empty())
}

/// Reads a number, accepting numeric strings. Anything else, including
/// non-finite values, reads as zero.
pub(crate) fn number(value: &Value, key: &str) -> f64 {
    let parsed = match present(value, key) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

pub(crate) fn count(value: &Value, key: &str) -> Option<u64> {
    match present(value, key)? {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Evidence lists keep their order. Nulls are dropped and non-string entries
/// are rendered as JSON text.
pub(crate) fn string_list(value: &Value, key: &str) -> Vec<String> {
    match present(value, key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(single)) if !single.trim().is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

/// Accepts RFC 3339, naive ISO-8601 (with or without fractional seconds) and
/// plain dates.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_accepts_numeric_strings_and_defaults_to_zero() {
        let value = json!({ "a": 2.5, "b": " 4 ", "c": "four", "d": null, "e": [1] });
        assert_eq!(number(&value, "a"), 2.5);
        assert_eq!(number(&value, "b"), 4.0);
        assert_eq!(number(&value, "c"), 0.0);
        assert_eq!(number(&value, "d"), 0.0);
        assert_eq!(number(&value, "e"), 0.0);
        assert_eq!(number(&value, "missing"), 0.0);
    }

    #[test]
    fn string_list_preserves_order_and_skips_nulls() {
        let value = json!({ "matched": ["zeta", null, 3, "alpha"] });
        assert_eq!(string_list(&value, "matched"), vec!["zeta", "3", "alpha"]);
    }

    #[test]
    fn text_ignores_blank_and_structured_values() {
        let value = json!({ "a": "  ", "b": { "x": 1 }, "c": 7, "d": "name.pdf" });
        assert_eq!(text(&value, "a"), None);
        assert_eq!(text(&value, "b"), None);
        assert_eq!(text(&value, "c").as_deref(), Some("7"));
        assert_eq!(text(&value, "d").as_deref(), Some("name.pdf"));
    }

    #[test]
    fn parse_timestamp_supports_common_backend_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14T09:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-03-14T09:30:00.250000").map(|dt| dt.date()),
            Some(expected.date())
        );
        assert_eq!(
            parse_timestamp("2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(" "), None);
    }
}
