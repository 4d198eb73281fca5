//! Request validation.
//!
//! Path ids and JSON bodies are checked by hand. Each failure becomes a
//! field-scoped [`FieldError`] and all failures of a request are returned
//! together.

use serde::Serialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::error::AppError;
use crate::api::models::{SummaryPayload, SummaryUpdatePayload};

/// Longest URL accepted on create or update.
pub const MAX_URL_LENGTH: usize = 2083;

/// One entry of a 422 response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<Value>,
    pub msg: String,
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Value>,
}

impl FieldError {
    fn body(field: &str, kind: &'static str, msg: impl Into<String>, input: Value) -> Self {
        Self {
            kind,
            loc: vec![json!("body"), json!(field)],
            msg: msg.into(),
            input,
            ctx: None,
        }
    }

    fn with_ctx(mut self, ctx: Value) -> Self {
        self.ctx = Some(ctx);
        self
    }
}

pub type Validated<T> = std::result::Result<T, Vec<FieldError>>;

/// Parse the `{id}` path segment. Ids must be integers greater than zero.
pub fn parse_id(raw: &str) -> Validated<i64> {
    let loc = vec![json!("path"), json!("id")];
    let id = raw.trim().parse::<i64>().map_err(|_| {
        vec![FieldError {
            kind: "int_parsing",
            loc: loc.clone(),
            msg: "Input should be a valid integer, unable to parse string as an integer".into(),
            input: json!(raw),
            ctx: None,
        }]
    })?;

    if id <= 0 {
        return Err(vec![FieldError {
            kind: "greater_than",
            loc,
            msg: "Input should be greater than 0".into(),
            input: json!(raw),
            ctx: Some(json!({ "gt": 0 })),
        }]);
    }

    Ok(id)
}

/// Validate a create body: `{"url": "..."}`.
pub fn parse_create(body: &[u8]) -> Validated<SummaryPayload> {
    let object = parse_object(body)?;
    let input = Value::Object(object.clone());
    let mut errors = Vec::new();

    let url = required_str(&object, &input, "url", &mut errors)
        .and_then(|raw| collect(validate_url(raw), &mut errors));

    match url {
        Some(url) if errors.is_empty() => Ok(SummaryPayload { url }),
        _ => Err(errors),
    }
}

/// Validate an update body: `{"url": "...", "summary": "..."}`.
pub fn parse_update(body: &[u8]) -> Validated<SummaryUpdatePayload> {
    let object = parse_object(body)?;
    let input = Value::Object(object.clone());
    let mut errors = Vec::new();

    let url = required_str(&object, &input, "url", &mut errors)
        .and_then(|raw| collect(validate_url(raw), &mut errors));
    let summary = required_str(&object, &input, "summary", &mut errors).map(str::to_owned);

    match (url, summary) {
        (Some(url), Some(summary)) if errors.is_empty() => Ok(SummaryUpdatePayload { url, summary }),
        _ => Err(errors),
    }
}

/// Check a URL string: it must parse, fit in [`MAX_URL_LENGTH`] and use
/// the `http` or `https` scheme. Returns the normalised URL.
pub fn validate_url(raw: &str) -> std::result::Result<Url, FieldError> {
    let input = json!(raw);

    if raw.len() > MAX_URL_LENGTH {
        return Err(FieldError::body(
            "url",
            "url_too_long",
            format!("URL should have at most {} characters", MAX_URL_LENGTH),
            input,
        )
        .with_ctx(json!({ "max_length": MAX_URL_LENGTH })));
    }

    if raw.trim().is_empty() {
        return Err(FieldError::body(
            "url",
            "url_parsing",
            "Input should be a valid URL, input is empty",
            input,
        ));
    }

    let url = Url::parse(raw).map_err(|e| {
        FieldError::body("url", "url_parsing", format!("Input should be a valid URL, {}", e), input.clone())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FieldError::body(
            "url",
            "url_scheme",
            "URL scheme should be 'http' or 'https'",
            input,
        )
        .with_ctx(json!({ "expected_schemes": "'http' or 'https'" })));
    }

    Ok(url)
}

/// Merge the outcome of path and body validation. Path errors are listed
/// first, matching the order the request is read in.
pub fn combine<A, B>(path: Validated<A>, body: Validated<B>) -> Result<(A, B), AppError> {
    match (path, body) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(mut errors), Err(more)) => {
            errors.extend(more);
            Err(AppError::ValidationError(errors))
        }
        (Err(errors), _) | (_, Err(errors)) => Err(AppError::ValidationError(errors)),
    }
}

fn collect<T>(result: std::result::Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

fn parse_object(body: &[u8]) -> Validated<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(vec![FieldError {
            kind: "missing",
            loc: vec![json!("body")],
            msg: "Field required".into(),
            input: Value::Null,
            ctx: None,
        }]);
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        vec![FieldError {
            kind: "json_invalid",
            loc: vec![json!("body"), json!(byte_offset(body, e.line(), e.column()))],
            msg: "JSON decode error".into(),
            input: json!({}),
            ctx: Some(json!({ "error": e.to_string() })),
        }]
    })?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(vec![FieldError {
            kind: "model_attributes_type",
            loc: vec![json!("body")],
            msg: "Input should be a valid dictionary or object to extract fields from".into(),
            input: other,
            ctx: None,
        }]),
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    input: &Value,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match object.get(field) {
        None => {
            errors.push(FieldError::body(field, "missing", "Field required", input.clone()));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.push(FieldError::body(field, "string_type", "Input should be a valid string", other.clone()));
            None
        }
    }
}

// serde_json reports 1-based line/column; clients get a byte offset.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    (preceding + column.saturating_sub(1)).min(body.len())
}
