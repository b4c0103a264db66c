//! # oauth-authz
//!
//! Authorization decisions for OAuth 2.0 protected resources.
//!
//! ## Components
//!
//! - **Authentication:** A client authentication plus an optional user
//!   authentication, with the effective authorities derived from the client's
//!   negotiated scope, the client's own authorities or the user's authorities.
//! - **Voting:** A scope voter granting, denying or abstaining on the
//!   `SCOPE_`-prefixed attributes a resource requires.
//! - **Token responses:** Parsing of token endpoint responses into access
//!   tokens or typed OAuth 2.0 errors.

pub mod authentication;
pub mod authority;
pub mod config;
pub mod error;
pub mod principal;
pub mod response;
pub mod serialization;
pub mod token;
pub mod vote;

pub use crate::authentication::OAuth2Authentication;
pub use crate::authority::{derive_authorities, Authority, AuthoritySource, GrantedAuthorities};
pub use crate::config::AuthzConfig;
pub use crate::error::{ErrorKind, OAuth2Error, ParseError, TokenResponseError};
pub use crate::principal::{ClientAuthentication, Principal, UserAuthentication};
pub use crate::response::{read_token_response, ResponseFormat};
pub use crate::serialization::{parse_access_token, parse_access_token_at, parse_error};
pub use crate::token::{AccessToken, AccessTokenBuilder, RefreshToken};
pub use crate::vote::{AccessDecisionVoter, ScopeVoter, Vote};
