//! Granted authorities and the derivation of an OAuth 2.0 authority set

use crate::principal::Principal;
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Prefix applied to client scopes when they are converted to authorities
pub const SCOPE_AUTHORITY_PREFIX: &str = "SCOPE_";

/// An opaque authority string such as `SCOPE_READ` or `ROLE_USER`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new<S: Into<String>>(authority: S) -> Self {
        Self(authority.into())
    }

    /// Authority granted by a client scope: upper-cased and prefixed with `SCOPE_`
    pub fn from_scope(scope: &str) -> Self {
        Self(format!("{SCOPE_AUTHORITY_PREFIX}{}", scope.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Authority {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Authority {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Authority {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which input produced a derived authority set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthoritySource {
    /// Converted from the client's negotiated scope
    ClientScope,
    /// The client's own default authorities
    Client,
    /// The user's authorities (possibly empty)
    User,
    /// Neither principal supplied anything
    None,
}

/// Authority set derived for an authentication, tagged with its source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantedAuthorities {
    source: AuthoritySource,
    authorities: BTreeSet<Authority>,
}

impl GrantedAuthorities {
    pub fn source(&self) -> AuthoritySource {
        self.source
    }

    pub fn authorities(&self) -> &BTreeSet<Authority> {
        &self.authorities
    }

    /// True only when no principal supplied an authority set at all
    pub fn is_absent(&self) -> bool {
        self.source == AuthoritySource::None
    }
}

/// Derives the effective authorities of a client/user pair.
///
/// Precedence is strict: a non-empty client scope wins outright, then the
/// client's non-empty authorities, then whatever the user holds. Empty client
/// sets fall through as if they were absent.
pub fn derive_authorities(
    client: &dyn Principal,
    user: Option<&dyn Principal>,
) -> GrantedAuthorities {
    let (source, authorities) = match client.scope().filter(|scope| !scope.is_empty()) {
        Some(scope) => (
            AuthoritySource::ClientScope,
            scope.iter().map(|s| Authority::from_scope(s)).collect(),
        ),
        None if !client.authorities().is_empty() => {
            (AuthoritySource::Client, client.authorities().clone())
        }
        None => match user {
            Some(user) => (AuthoritySource::User, user.authorities().clone()),
            None => (AuthoritySource::None, BTreeSet::new()),
        },
    };

    debug!(
        "Derived {} authorities for client '{}' from {:?}",
        authorities.len(),
        client.name(),
        source
    );

    GrantedAuthorities {
        source,
        authorities,
    }
}
