//! Authorization configuration

use crate::authority::SCOPE_AUTHORITY_PREFIX;
use confique::Config;
use std::path::Path;

/// Authorization configuration
#[derive(Debug, Config, Clone, PartialEq)]
pub struct AuthzConfig {
    /// Prefix of the required attributes handled by the scope voter
    /// (default: "SCOPE_")
    #[config(env = "OAUTH_AUTHZ_SCOPE_PREFIX", default = "SCOPE_")]
    pub scope_prefix: String,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            scope_prefix: SCOPE_AUTHORITY_PREFIX.to_string(),
        }
    }
}

impl AuthzConfig {
    /// Loads the configuration from environment variables
    pub fn new() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }

    /// Loads the configuration from a TOML file, environment variables taking precedence
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, confique::Error> {
        Self::builder().env().file(path.as_ref()).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PREFIX_VAR: &str = "OAUTH_AUTHZ_SCOPE_PREFIX";

    #[test]
    fn test_default_authz_config() {
        let config = AuthzConfig::default();
        assert_eq!(config.scope_prefix, "SCOPE_");
    }

    // Environment and file sources are exercised in one test to avoid racing
    // on the shared variable.
    #[test]
    fn test_load_authz_config() {
        std::env::remove_var(PREFIX_VAR);
        let config = AuthzConfig::new().unwrap();
        assert_eq!(config, AuthzConfig::default());

        let path = std::env::temp_dir().join(format!("oauth-authz-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "scope_prefix = \"PERM_\"").unwrap();
        drop(file);

        let config = AuthzConfig::from_file(&path).unwrap();
        assert_eq!(config.scope_prefix, "PERM_");

        std::env::set_var(PREFIX_VAR, "OAUTH_");
        let from_env = AuthzConfig::new().unwrap();
        let env_over_file = AuthzConfig::from_file(&path).unwrap();
        std::env::remove_var(PREFIX_VAR);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(from_env.scope_prefix, "OAUTH_");
        assert_eq!(env_over_file.scope_prefix, "OAUTH_");
    }
}
