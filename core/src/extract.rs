//! Pull the result text out of a successful backend response.
//!
//! Backends disagree on where the text lives (`report`, `summary`, `reply`,
//! ...), so extraction walks an ordered list of field names against a
//! loosely typed `serde_json::Value` and takes the first non-empty string.

use serde_json::Value;

use crate::http::HttpResponse;

/// Text of a 2xx response for an operation whose result lives in `fields`.
///
/// JSON bodies (declared, or with no content type at all) go through field
/// extraction. Anything else, including JSON that fails to parse, is
/// returned as raw text.
pub fn response_text(response: &HttpResponse, fields: &[&str]) -> String {
    if !declares_json(response.content_type()) {
        return response.body.clone();
    }
    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => value_text(&value, fields),
        Err(_) => response.body.clone(),
    }
}

/// Result text from a parsed JSON value.
///
/// Falls back to the serialized value when no field matches.
pub fn value_text(value: &Value, fields: &[&str]) -> String {
    if let Value::String(s) = value {
        return s.clone();
    }
    first_field(value, fields).unwrap_or_else(|| value.to_string())
}

/// First field in `fields` holding a non-blank string.
pub fn first_field(value: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| value.get(*field))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn declares_json(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        }
    }
}
