//! Decoding of raw token endpoint responses
//!
//! Authorization servers answer token requests either with a JSON object or
//! with a form-encoded body. Both are flattened into the string map consumed
//! by [`crate::serialization`].

use crate::error::{ParseError, TokenResponseError};
use crate::serialization::{parse_access_token, parse_error};
use crate::token::AccessToken;
use http::StatusCode;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body encoding of a token endpoint response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Form,
}

impl ResponseFormat {
    /// Picks the format from a `Content-Type` value, defaulting to JSON
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let media_type = content_type
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .unwrap_or_default();
        if media_type.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
            Self::Form
        } else {
            Self::Json
        }
    }

    pub fn decode(self, body: &[u8]) -> Result<HashMap<String, String>, ParseError> {
        match self {
            Self::Json => decode_json(body),
            Self::Form => Ok(decode_form(body)),
        }
    }
}

/// Flattens a JSON object into string parameters.
///
/// Numbers and booleans keep their textual form, string arrays are joined
/// with a space, nulls are dropped and nested objects stay JSON text.
pub fn decode_json(body: &[u8]) -> Result<HashMap<String, String>, ParseError> {
    let object = match serde_json::from_slice::<Value>(body)? {
        Value::Object(object) => object,
        other => return Err(ParseError::NotAnObject(json_type(&other).to_string())),
    };

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| flatten_value(value).map(|value| (key, value)))
        .collect())
}

/// Decodes an `application/x-www-form-urlencoded` body
pub fn decode_form(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// Reads a token endpoint response into an access token or a typed error.
///
/// Any non-success status, or a body carrying an `error` parameter, is
/// reported as [`TokenResponseError::OAuth2`].
pub fn read_token_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<AccessToken, TokenResponseError> {
    let format = ResponseFormat::from_content_type(content_type);
    let params = format.decode(body)?;
    debug!(
        "Decoded {} token response parameters ({:?}, status {})",
        params.len(),
        format,
        status
    );

    if !status.is_success() || params.contains_key("error") {
        let error = parse_error(&params);
        warn!(
            "Token endpoint returned error '{}' with status {}: {}",
            error.code(),
            status,
            error.message()
        );
        return Err(TokenResponseError::OAuth2(error));
    }

    Ok(parse_access_token(&params)?)
}

fn flatten_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(flatten_value)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        object @ Value::Object(_) => Some(object.to_string()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
