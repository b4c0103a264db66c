//! OAuth 2.0 access token value objects

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Splits a scope parameter on spaces and commas.
///
/// Empty tokens are dropped, duplicates collapse and the result iterates in
/// lexicographic order.
pub fn parse_scope(scope: &str) -> BTreeSet<String> {
    scope
        .split([' ', ','])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a scope set into its space-delimited wire form
pub fn format_scope(scope: &BTreeSet<String>) -> String {
    scope.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// A refresh token issued alongside an access token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An access token as returned by an authorization server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expiration: Option<DateTime<Utc>>,
    refresh_token: Option<RefreshToken>,
    scope: Option<BTreeSet<String>>,
    token_type: Option<String>,
}

impl AccessToken {
    /// Start building a token with the given token string
    pub fn builder<S: Into<String>>(value: S) -> AccessTokenBuilder {
        AccessTokenBuilder {
            token: AccessToken {
                value: value.into(),
                expiration: None,
                refresh_token: None,
                scope: None,
                token_type: None,
            },
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    pub fn scope(&self) -> Option<&BTreeSet<String>> {
        self.scope.as_ref()
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Seconds left before expiry at `now`, never negative
    pub fn expires_in_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expiration
            .map(|expiration| (expiration - now).num_seconds().max(0))
    }

    pub fn expires_in(&self) -> Option<i64> {
        self.expires_in_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Wire parameters of the token, with `expires_in` relative to `now`
    pub fn to_parameters_at(&self, now: DateTime<Utc>) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("access_token".to_string(), self.value.clone());
        if let Some(token_type) = &self.token_type {
            params.insert("token_type".to_string(), token_type.clone());
        }
        if let Some(expires_in) = self.expires_in_at(now) {
            params.insert("expires_in".to_string(), expires_in.to_string());
        }
        if let Some(refresh_token) = &self.refresh_token {
            params.insert("refresh_token".to_string(), refresh_token.value().to_string());
        }
        if let Some(scope) = &self.scope {
            params.insert("scope".to_string(), format_scope(scope));
        }
        params
    }

    pub fn to_parameters(&self) -> BTreeMap<String, String> {
        self.to_parameters_at(Utc::now())
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("access_token", &self.value)?;
        if let Some(token_type) = &self.token_type {
            map.serialize_entry("token_type", token_type)?;
        }
        if let Some(refresh_token) = &self.refresh_token {
            map.serialize_entry("refresh_token", refresh_token.value())?;
        }
        if let Some(expires_in) = self.expires_in() {
            map.serialize_entry("expires_in", &expires_in)?;
        }
        if let Some(scope) = &self.scope {
            map.serialize_entry("scope", &format_scope(scope))?;
        }
        map.end()
    }
}

/// Builds an [`AccessToken`]; the token only exists once `build` is called.
#[derive(Debug, Clone)]
pub struct AccessTokenBuilder {
    token: AccessToken,
}

impl AccessTokenBuilder {
    pub fn expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.token.expiration = Some(expiration);
        self
    }

    pub fn refresh_token(mut self, refresh_token: RefreshToken) -> Self {
        self.token.refresh_token = Some(refresh_token);
        self
    }

    pub fn scope(mut self, scope: BTreeSet<String>) -> Self {
        self.token.scope = Some(scope);
        self
    }

    pub fn token_type<S: Into<String>>(mut self, token_type: S) -> Self {
        self.token.token_type = Some(token_type.into());
        self
    }

    pub fn build(self) -> AccessToken {
        self.token
    }
}
