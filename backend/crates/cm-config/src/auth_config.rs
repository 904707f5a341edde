use crate::{ConfigError, ConfigErrorResult, DEFAULT_AUTH_ENABLED, DEFAULT_USER, MIN_JWT_SECRET_LENGTH};

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// HS256 shared secret
    pub jwt_secret: Option<String>,
    /// RS256 public key, relative to the config dir
    pub jwt_public_key_path: Option<String>,
    /// User name sessions run as when auth is disabled and no name is given
    pub default_user: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_AUTH_ENABLED,
            jwt_secret: None,
            jwt_public_key_path: None,
            default_user: String::from(DEFAULT_USER),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self, config_dir: &Path) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        match (&self.jwt_secret, &self.jwt_public_key_path) {
            (Some(secret), _) => {
                if secret.len() < MIN_JWT_SECRET_LENGTH {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_secret must be at least {} characters",
                        MIN_JWT_SECRET_LENGTH
                    )));
                }
            }
            (None, Some(key_path)) => {
                if Path::new(key_path).is_absolute() || key_path.contains("..") {
                    return Err(ConfigError::auth(
                        "auth.jwt_public_key_path must be relative and cannot contain '..'",
                    ));
                }
                if !config_dir.join(key_path).exists() {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_public_key_path not found: {}",
                        key_path
                    )));
                }
            }
            (None, None) => {
                return Err(ConfigError::auth(
                    "auth.enabled requires auth.jwt_secret or auth.jwt_public_key_path",
                ));
            }
        }

        Ok(())
    }
}
