use crate::{Result as ServerErrorResult, ServerError};

use cm_auth::{Authenticator, JwtValidator};
use cm_config::AuthConfig;

use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{info, warn};

/// Build the `connect` authenticator from config.
///
/// `config_dir` resolves a relative RS256 public key path. Assumes the config
/// has been validated.
pub fn build_authenticator(auth: &AuthConfig, config_dir: &Path) -> ServerErrorResult<Authenticator> {
    if !auth.enabled {
        warn!("Authentication DISABLED - connect credentials are taken as user names");
        return Ok(Authenticator::disabled(auth.default_user.clone()));
    }

    let validator = if let Some(ref secret) = auth.jwt_secret {
        info!("JWT: HS256 authentication enabled");
        JwtValidator::with_hs256(secret.as_bytes())
    } else if let Some(ref key_path) = auth.jwt_public_key_path {
        let full_path = config_dir.join(key_path);
        let public_key =
            std::fs::read_to_string(&full_path).map_err(|e| ServerError::JwtKeyFile {
                path: full_path.display().to_string(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
        info!("JWT: RS256 authentication enabled");
        JwtValidator::with_rs256(&public_key)?
    } else {
        return Err(ServerError::from(cm_config::ConfigError::auth(
            "auth.enabled requires auth.jwt_secret or auth.jwt_public_key_path",
        )));
    };

    Ok(Authenticator::new(
        Some(Arc::new(validator)),
        auth.default_user.clone(),
    ))
}
