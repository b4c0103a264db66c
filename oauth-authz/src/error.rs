//! OAuth 2.0 error taxonomy and crate error types

use http::StatusCode;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Message used when an error response carries neither code nor description
pub const DEFAULT_ERROR_MESSAGE: &str = "OAuth Error";

/// The closed set of OAuth 2.0 error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    InvalidClient,
    UnauthorizedClient,
    InvalidGrant,
    InvalidScope,
    InvalidToken,
    /// Also used for unknown or missing error codes
    #[default]
    InvalidRequest,
    RedirectUriMismatch,
    UnsupportedGrantType,
    UnsupportedResponseType,
    AccessDenied,
}

impl ErrorKind {
    /// Resolve a wire error code. Unknown codes degrade to `InvalidRequest`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalid_client" => Self::InvalidClient,
            "unauthorized_client" => Self::UnauthorizedClient,
            "invalid_grant" => Self::InvalidGrant,
            "invalid_scope" => Self::InvalidScope,
            "invalid_token" => Self::InvalidToken,
            "redirect_uri_mismatch" => Self::RedirectUriMismatch,
            "unsupported_grant_type" => Self::UnsupportedGrantType,
            "unsupported_response_type" => Self::UnsupportedResponseType,
            "access_denied" => Self::AccessDenied,
            _ => Self::InvalidRequest,
        }
    }

    /// The wire error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidClient => "invalid_client",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidScope => "invalid_scope",
            Self::InvalidToken => "invalid_token",
            Self::InvalidRequest => "invalid_request",
            Self::RedirectUriMismatch => "redirect_uri_mismatch",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::AccessDenied => "access_denied",
        }
    }

    /// HTTP status a transport layer would normally answer with
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidClient | Self::UnauthorizedClient | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccessDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A typed OAuth 2.0 error with free-form diagnostic fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OAuth2Error {
    kind: ErrorKind,
    message: String,
    additional_information: BTreeMap<String, String>,
}

impl OAuth2Error {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            additional_information: BTreeMap::new(),
        }
    }

    /// Attach a diagnostic field
    pub fn with_additional_information<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.additional_information.insert(key.into(), value.into());
        self
    }

    pub fn invalid_client<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidClient, message)
    }

    pub fn invalid_grant<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidGrant, message)
    }

    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn access_denied<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> StatusCode {
        self.kind.http_status()
    }

    pub fn additional_information(&self) -> &BTreeMap<String, String> {
        &self.additional_information
    }

    /// Wire parameters: `error`, `error_description` and every diagnostic field
    pub fn to_parameters(&self) -> BTreeMap<String, String> {
        let mut params = self.additional_information.clone();
        params.insert("error".to_string(), self.code().to_string());
        params.insert("error_description".to_string(), self.message.clone());
        params
    }
}

impl Serialize for OAuth2Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("error", self.code())?;
        map.serialize_entry("error_description", &self.message)?;
        for (key, value) in &self.additional_information {
            if key != "error" && key != "error_description" {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Errors raised while reading a token endpoint response
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Token response is missing the access_token parameter")]
    MissingAccessToken,
    #[error("Failed to decode JSON response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(String),
}

/// Outcome of a token request that did not yield an access token
#[derive(Debug, Error)]
pub enum TokenResponseError {
    #[error("Authorization server error ({code}): {0}", code = .0.code())]
    OAuth2(#[from] OAuth2Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL_KINDS: [ErrorKind; 10] = [
        ErrorKind::InvalidClient,
        ErrorKind::UnauthorizedClient,
        ErrorKind::InvalidGrant,
        ErrorKind::InvalidScope,
        ErrorKind::InvalidToken,
        ErrorKind::InvalidRequest,
        ErrorKind::RedirectUriMismatch,
        ErrorKind::UnsupportedGrantType,
        ErrorKind::UnsupportedResponseType,
        ErrorKind::AccessDenied,
    ];

    #[test]
    fn test_codes_resolve_to_their_kind() {
        for kind in ALL_KINDS {
            assert_eq!(ErrorKind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn test_unknown_code_is_invalid_request() {
        assert_eq!(ErrorKind::from_code("bogus_code"), ErrorKind::InvalidRequest);
        assert_eq!(ErrorKind::from_code(""), ErrorKind::InvalidRequest);
        assert_eq!(ErrorKind::default(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorKind::InvalidClient.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::InvalidToken.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::AccessDenied.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::InvalidGrant.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidRequest.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display_is_message() {
        let error = OAuth2Error::invalid_grant("Bad credentials");
        assert_eq!(error.to_string(), "Bad credentials");
        assert_eq!(error.kind().to_string(), "invalid_grant");
    }

    #[test]
    fn test_serialize_oauth2_error() {
        let error = OAuth2Error::invalid_token("Token expired")
            .with_additional_information("realm", "sparklr");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({
                "error": "invalid_token",
                "error_description": "Token expired",
                "realm": "sparklr",
            })
        );
        assert_eq!(error.to_parameters().len(), 3);
    }

    #[test]
    fn test_token_response_error_display() {
        let error: TokenResponseError = OAuth2Error::access_denied("User denied access").into();
        assert_eq!(
            error.to_string(),
            "Authorization server error (access_denied): User denied access"
        );

        let error: TokenResponseError = ParseError::MissingAccessToken.into();
        assert_eq!(
            error.to_string(),
            "Token response is missing the access_token parameter"
        );
    }
}
