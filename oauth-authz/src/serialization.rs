//! Conversion of token endpoint parameters into access tokens and errors

use crate::error::{ErrorKind, OAuth2Error, ParseError, DEFAULT_ERROR_MESSAGE};
use crate::token::{parse_scope, AccessToken, RefreshToken};
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use std::collections::HashMap;

/// Builds an access token from a successful token response, using the
/// current time as the base of `expires_in`
pub fn parse_access_token(params: &HashMap<String, String>) -> Result<AccessToken, ParseError> {
    parse_access_token_at(params, Utc::now())
}

/// Builds an access token from a successful token response.
///
/// A non-numeric `expires_in` is read as zero seconds. Unknown parameters
/// are ignored.
pub fn parse_access_token_at(
    params: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<AccessToken, ParseError> {
    let value = params
        .get("access_token")
        .ok_or(ParseError::MissingAccessToken)?;
    let mut builder = AccessToken::builder(value.as_str());

    if let Some(expires_in) = params.get("expires_in") {
        let seconds = expires_in.parse::<i64>().unwrap_or_else(|e| {
            warn!("Ignoring invalid expires_in value '{}': {}", expires_in, e);
            0
        });
        builder = builder.expiration(expiration_after(now, seconds));
    }

    if let Some(refresh_token) = params.get("refresh_token") {
        builder = builder.refresh_token(RefreshToken::new(refresh_token.as_str()));
    }

    if let Some(scope) = params.get("scope") {
        builder = builder.scope(parse_scope(scope));
    }

    if let Some(token_type) = params.get("token_type") {
        builder = builder.token_type(token_type.as_str());
    }

    Ok(builder.build())
}

/// Builds a typed error from an error response. Never fails: unknown codes
/// map to `invalid_request`.
pub fn parse_error(params: &HashMap<String, String>) -> OAuth2Error {
    let code = params.get("error").map(String::as_str);
    let message = params
        .get("error_description")
        .map(String::as_str)
        .or(code)
        .unwrap_or(DEFAULT_ERROR_MESSAGE);
    let kind = code.map_or(ErrorKind::InvalidRequest, ErrorKind::from_code);

    debug!("Parsed OAuth error {:?} (code: {:?})", kind, code);

    params
        .iter()
        .filter(|(key, _)| key.as_str() != "error" && key.as_str() != "error_description")
        .fold(OAuth2Error::new(kind, message), |error, (key, value)| {
            error.with_additional_information(key.as_str(), value.as_str())
        })
}

// Saturates instead of overflowing on absurd lifetimes.
fn expiration_after(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    let bound = if seconds < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_minimal_access_token() {
        let token = parse_access_token(&params(&[("access_token", "FOO")])).unwrap();
        assert_eq!(token, AccessToken::builder("FOO").build());
    }

    #[test]
    fn test_missing_access_token() {
        let result = parse_access_token(&params(&[("token_type", "bearer")]));
        assert!(matches!(result, Err(ParseError::MissingAccessToken)));
    }

    #[test]
    fn test_full_access_token() {
        let now = Utc::now();
        let token = parse_access_token_at(
            &params(&[
                ("access_token", "FOO"),
                ("expires_in", "3600"),
                ("refresh_token", "BAR"),
                ("scope", "write read"),
                ("token_type", "bearer"),
                ("unexpected", "ignored"),
            ]),
            now,
        )
        .unwrap();

        assert_eq!(token.value(), "FOO");
        assert_eq!(token.expiration(), Some(now + TimeDelta::seconds(3600)));
        assert_eq!(token.refresh_token().map(RefreshToken::value), Some("BAR"));
        assert_eq!(
            token.scope().unwrap().iter().collect::<Vec<_>>(),
            vec!["read", "write"]
        );
        assert_eq!(token.token_type(), Some("bearer"));
    }

    #[test]
    fn test_comma_delimited_scope() {
        let token =
            parse_access_token(&params(&[("access_token", "FOO"), ("scope", "read,write")]))
                .unwrap();
        let expected: BTreeSet<String> = ["write", "read"].iter().map(|s| s.to_string()).collect();
        assert_eq!(token.scope(), Some(&expected));
    }

    #[test]
    fn test_invalid_expires_in_is_zero() {
        let now = Utc::now();
        let token = parse_access_token_at(
            &params(&[("access_token", "FOO"), ("expires_in", "soon")]),
            now,
        )
        .unwrap();
        assert_eq!(token.expiration(), Some(now));
        assert!(token.is_expired_at(now));
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        let now = Utc::now();
        let token = parse_access_token_at(
            &params(&[("access_token", "FOO"), ("expires_in", i64::MAX.to_string().as_str())]),
            now,
        )
        .unwrap();
        assert_eq!(token.expiration(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_error_without_description() {
        let error = parse_error(&params(&[("error", "invalid_grant")]));
        assert_eq!(error.kind(), ErrorKind::InvalidGrant);
        assert_eq!(error.message(), "invalid_grant");
        assert!(error.additional_information().is_empty());
    }

    #[test]
    fn test_unknown_error_code() {
        let error = parse_error(&params(&[
            ("error", "bogus_code"),
            ("error_description", "x"),
        ]));
        assert_eq!(error.kind(), ErrorKind::InvalidRequest);
        assert_eq!(error.message(), "x");
    }

    #[test]
    fn test_error_without_code() {
        let error = parse_error(&HashMap::new());
        assert_eq!(error.kind(), ErrorKind::InvalidRequest);
        assert_eq!(error.message(), "OAuth Error");
    }

    #[test]
    fn test_error_additional_information() {
        let error = parse_error(&params(&[
            ("error", "invalid_token"),
            ("error_description", "Invalid access token: FOO"),
            ("realm", "sparklr"),
            ("scope", "read"),
        ]));
        assert_eq!(error.kind(), ErrorKind::InvalidToken);
        let info = error.additional_information();
        assert_eq!(info.len(), 2);
        assert_eq!(info["realm"], "sparklr");
        assert_eq!(info["scope"], "read");
    }

    #[test]
    fn test_every_error_code() {
        for code in [
            "invalid_client",
            "unauthorized_client",
            "invalid_grant",
            "invalid_scope",
            "invalid_token",
            "invalid_request",
            "redirect_uri_mismatch",
            "unsupported_grant_type",
            "unsupported_response_type",
            "access_denied",
        ] {
            let error = parse_error(&params(&[("error", code)]));
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn test_parameters_round_trip() {
        let now = Utc::now();
        let original = parse_access_token_at(
            &params(&[
                ("access_token", "FOO"),
                ("expires_in", "120"),
                ("scope", "read,write"),
            ]),
            now,
        )
        .unwrap();
        let reparsed: HashMap<String, String> = original.to_parameters_at(now).into_iter().collect();
        assert_eq!(parse_access_token_at(&reparsed, now).unwrap(), original);
    }
}
