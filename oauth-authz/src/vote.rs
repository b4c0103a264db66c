//! Access decision voting on OAuth 2.0 scopes

use crate::authority::SCOPE_AUTHORITY_PREFIX;
use crate::config::AuthzConfig;
use crate::principal::Principal;
use log::debug;
use serde::Serialize;

/// Outcome of a single voter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Granted,
    Abstain,
    Denied,
}

impl Vote {
    /// Conventional numeric value used by vote aggregation policies
    pub fn as_i32(self) -> i32 {
        match self {
            Vote::Granted => 1,
            Vote::Abstain => 0,
            Vote::Denied => -1,
        }
    }
}

/// A participant in an access decision.
///
/// A voter that supports none of the required attributes must abstain so
/// that other voters owning those attributes can decide.
pub trait AccessDecisionVoter: Send + Sync {
    /// Whether this voter is responsible for the given attribute
    fn supports(&self, attribute: &str) -> bool;

    /// Vote on access for the authentication given the required attributes
    fn vote(&self, authentication: &dyn Principal, attributes: &[&str]) -> Vote;
}

/// Votes on attributes carrying the scope prefix (`SCOPE_` by default).
///
/// Access is granted as soon as any required scope attribute is held by the
/// authentication, denied when scope attributes are required but none is
/// held, and abstained when no scope attribute is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeVoter {
    scope_prefix: String,
}

impl Default for ScopeVoter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeVoter {
    /// Create a voter using the default `SCOPE_` prefix
    pub fn new() -> Self {
        Self::with_prefix(SCOPE_AUTHORITY_PREFIX)
    }

    /// Create a voter with a custom prefix. An empty prefix makes the voter
    /// responsible for every attribute.
    pub fn with_prefix<S: Into<String>>(scope_prefix: S) -> Self {
        Self {
            scope_prefix: scope_prefix.into(),
        }
    }

    pub fn from_config(config: &AuthzConfig) -> Self {
        Self::with_prefix(config.scope_prefix.as_str())
    }

    pub fn scope_prefix(&self) -> &str {
        &self.scope_prefix
    }
}

impl AccessDecisionVoter for ScopeVoter {
    fn supports(&self, attribute: &str) -> bool {
        attribute.starts_with(&self.scope_prefix)
    }

    fn vote(&self, authentication: &dyn Principal, attributes: &[&str]) -> Vote {
        let authorities = authentication.authorities();
        let mut result = Vote::Abstain;

        for attribute in attributes.iter().filter(|a| self.supports(a)) {
            result = Vote::Denied;
            if authorities.contains(*attribute) {
                debug!(
                    "Granting '{}' access for required scope {}",
                    authentication.name(),
                    attribute
                );
                return Vote::Granted;
            }
        }

        debug!(
            "Scope vote for '{}' on {:?}: {:?}",
            authentication.name(),
            attributes,
            result
        );
        result
    }
}
