//! Principals taking part in an OAuth 2.0 handshake

use crate::authority::Authority;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Capability set shared by every authenticated party (client or end user).
///
/// Scope is an optional capability: only client principals carry a
/// negotiated scope, so the default implementation reports none.
pub trait Principal: Debug + Send + Sync {
    /// Identity of the principal (client id, username, ...)
    fn name(&self) -> &str;

    /// Credentials presented during authentication, if retained
    fn credentials(&self) -> Option<&str>;

    /// Whether the principal completed authentication
    fn is_authenticated(&self) -> bool;

    /// Authorities granted directly to the principal
    fn authorities(&self) -> &BTreeSet<Authority>;

    /// Scope negotiated with the resource owner, if the principal has one
    fn scope(&self) -> Option<&BTreeSet<String>> {
        None
    }
}

/// Returns true when both principals expose identical capability values.
pub fn same_principal(a: &dyn Principal, b: &dyn Principal) -> bool {
    a.name() == b.name()
        && a.credentials() == b.credentials()
        && a.is_authenticated() == b.is_authenticated()
        && a.authorities() == b.authorities()
        && a.scope() == b.scope()
}

/// An authenticated OAuth 2.0 client application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAuthentication {
    client_id: String,
    client_secret: Option<String>,
    scope: Option<BTreeSet<String>>,
    authorities: BTreeSet<Authority>,
    authenticated: bool,
}

impl ClientAuthentication {
    /// Create an authenticated client with no scope and no authorities
    pub fn new<S: Into<String>>(client_id: S) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            scope: None,
            authorities: BTreeSet::new(),
            authenticated: true,
        }
    }

    /// Set the client secret used to authenticate
    pub fn with_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Set the scope granted to the client
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    /// Set the client's default authorities
    pub fn with_authorities<I, A>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Authority>,
    {
        self.authorities = authorities.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the client as authenticated or not
    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl Principal for ClientAuthentication {
    fn name(&self) -> &str {
        &self.client_id
    }

    fn credentials(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn authorities(&self) -> &BTreeSet<Authority> {
        &self.authorities
    }

    fn scope(&self) -> Option<&BTreeSet<String>> {
        self.scope.as_ref()
    }
}

/// An end user authenticated with a username and password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAuthentication {
    username: String,
    password: Option<String>,
    authorities: BTreeSet<Authority>,
    authenticated: bool,
}

impl UserAuthentication {
    /// Create an authenticated user holding the given authorities
    pub fn new<S, I, A>(username: S, authorities: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<Authority>,
    {
        Self {
            username: username.into(),
            password: None,
            authorities: authorities.into_iter().map(Into::into).collect(),
            authenticated: true,
        }
    }

    /// Keep the password the user authenticated with
    pub fn with_password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Mark the user as authenticated or not
    pub fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }
}

impl Principal for UserAuthentication {
    fn name(&self) -> &str {
        &self.username
    }

    fn credentials(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn authorities(&self) -> &BTreeSet<Authority> {
        &self.authorities
    }
}
