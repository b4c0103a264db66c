//! OAuth 2.0 authentication aggregate
//!
//! An OAuth 2.0 authentication always carries the client that presented the
//! token and, for profiles that involve a resource owner, the user on whose
//! behalf the client acts. Flows such as client credentials have no user.

use crate::authority::{derive_authorities, Authority, AuthoritySource, GrantedAuthorities};
use crate::principal::{same_principal, Principal};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Client authentication plus an optional user authentication.
///
/// The authority set is derived once at construction and never recomputed.
#[derive(Debug, Clone)]
pub struct OAuth2Authentication {
    client: Arc<dyn Principal>,
    user: Option<Arc<dyn Principal>>,
    granted: GrantedAuthorities,
}

impl OAuth2Authentication {
    /// Create an authentication for a client and an optional user
    pub fn new(client: Arc<dyn Principal>, user: Option<Arc<dyn Principal>>) -> Self {
        let granted = derive_authorities(client.as_ref(), user.as_deref());
        Self {
            client,
            user,
            granted,
        }
    }

    /// Credentials of the user if present, otherwise of the client
    pub fn credentials(&self) -> Option<&str> {
        self.effective_principal().credentials()
    }

    /// Identity of the user if present, otherwise of the client
    pub fn principal_identity(&self) -> &str {
        self.effective_principal().name()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
            && self
                .user
                .as_ref()
                .map_or(true, |user| user.is_authenticated())
    }

    pub fn authorities(&self) -> &BTreeSet<Authority> {
        self.granted.authorities()
    }

    /// Which principal the authorities were taken from
    pub fn authority_source(&self) -> AuthoritySource {
        self.granted.source()
    }

    pub fn client_principal(&self) -> &Arc<dyn Principal> {
        &self.client
    }

    pub fn user_principal(&self) -> Option<&Arc<dyn Principal>> {
        self.user.as_ref()
    }

    /// True when no user took part (e.g. client credentials grant)
    pub fn is_client_only(&self) -> bool {
        self.user.is_none()
    }

    fn effective_principal(&self) -> &dyn Principal {
        match &self.user {
            Some(user) => user.as_ref(),
            None => self.client.as_ref(),
        }
    }
}

impl Principal for OAuth2Authentication {
    fn name(&self) -> &str {
        self.principal_identity()
    }

    fn credentials(&self) -> Option<&str> {
        OAuth2Authentication::credentials(self)
    }

    fn is_authenticated(&self) -> bool {
        OAuth2Authentication::is_authenticated(self)
    }

    fn authorities(&self) -> &BTreeSet<Authority> {
        OAuth2Authentication::authorities(self)
    }
}

impl PartialEq for OAuth2Authentication {
    fn eq(&self, other: &Self) -> bool {
        if !same_principal(self.client.as_ref(), other.client.as_ref()) {
            return false;
        }
        match (&self.user, &other.user) {
            (Some(a), Some(b)) => same_principal(a.as_ref(), b.as_ref()),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for OAuth2Authentication {}

impl Hash for OAuth2Authentication {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_principal(self.client.as_ref(), state);
        match &self.user {
            Some(user) => {
                1u8.hash(state);
                hash_principal(user.as_ref(), state);
            }
            None => 0u8.hash(state),
        }
    }
}

// Only values compared by `same_principal` may be hashed here.
fn hash_principal<H: Hasher>(principal: &dyn Principal, state: &mut H) {
    principal.name().hash(state);
    principal.credentials().hash(state);
    principal.is_authenticated().hash(state);
    principal.authorities().hash(state);
    principal.scope().hash(state);
}
