//! # vetter-http-common — Shared HTTP helpers for `vetter` web integrations
//!
//! This crate provides the request-decoding and response-encoding pieces used
//! by `vetter-tower` and `vetter-axum`.
//!
//! **Not intended for direct use by end users** — import via the
//! framework-specific crate instead.

use serde_json::{Map, Value};
use vetter::{FailureBody, RequestParts, ValidationError, ValidationErrors};

/// Parse a URL query string into a `serde_json::Map`.
///
/// Keys and values are URL-decoded and kept as strings: no type coercion, so
/// `string` fields see exactly what the client sent (numeric fields coerce
/// on their own). A key repeated more than once becomes an array of strings.
/// Empty pairs are skipped.
pub fn parse_query_string(query: &str) -> Map<String, Value> {
    let mut map = Map::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, raw_value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };

        let key = url_decode(key);
        let value = Value::String(url_decode(raw_value));

        match map.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }

    map
}

/// Percent-decode a URL component.
///
/// Handles `%XX` hex escapes (decoded as bytes, then read as UTF-8 with
/// lossy replacement) and `+` → space. Malformed escapes are kept verbatim.
pub fn url_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match decode_hex_pair(bytes[i + 1], bytes[i + 2]) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn decode_hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Whether a `Content-Type` value denotes JSON (`application/json`, `*+json`).
pub fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Whether a `Content-Type` value denotes a URL-encoded form.
pub fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .eq_ignore_ascii_case("application/x-www-form-urlencoded")
}

/// Why a request body could not be turned into a parameter container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    /// The body claimed to be JSON but did not parse.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    /// A form body was not valid UTF-8.
    #[error("form body is not valid UTF-8")]
    InvalidUtf8,
}

/// Decode raw body bytes into the `body` container.
///
/// - empty body → empty container
/// - JSON → parsed; a non-mapping document (array, scalar) → empty container
/// - URL-encoded form → parsed like a query string
/// - any other (or missing) content type → empty container
pub fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Map<String, Value>, BodyError> {
    if bytes.is_empty() {
        return Ok(Map::new());
    }
    match content_type {
        Some(ct) if is_json_content_type(ct) => {
            match serde_json::from_slice::<Value>(bytes) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Ok(Map::new()),
                Err(e) => Err(BodyError::InvalidJson(e.to_string())),
            }
        }
        Some(ct) if is_form_content_type(ct) => {
            let text = std::str::from_utf8(bytes).map_err(|_| BodyError::InvalidUtf8)?;
            Ok(parse_query_string(text))
        }
        _ => Ok(Map::new()),
    }
}

/// Build path-parameter container from `(name, value)` pairs. Values stay strings.
pub fn path_params_to_map<'a, I>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Assemble the three containers of a request.
pub fn request_parts(
    query: Option<&str>,
    content_type: Option<&str>,
    body: &[u8],
    params: Map<String, Value>,
) -> Result<RequestParts, BodyError> {
    let body = decode_body(content_type, body)?;
    Ok(RequestParts {
        body,
        query: query.map(parse_query_string).unwrap_or_default(),
        params,
    })
}

/// Request extension holding the decoded containers of a request that passed
/// validation.
///
/// Inserted by both `vetter-tower` and `vetter-axum`, so code behind either
/// reads it with `extensions().get::<ValidatedParams>()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParams(pub RequestParts);

/// Failure payload for a body that could not be decoded.
///
/// Reported like any other type mismatch: `body must be of type object`.
pub fn body_error_failure(err: &BodyError) -> FailureBody {
    tracing::debug!(error = %err, "rejecting undecodable request body");
    FailureBody::new(ValidationErrors::from(vec![ValidationError::wrong_type(
        "body", "object",
    )]))
}

/// Serialize a failure payload to response bytes.
pub fn failure_bytes(body: &FailureBody) -> Vec<u8> {
    serde_json::to_vec(body).expect("FailureBody serialization cannot fail")
}
