use crate::{AuthError, AuthenticatedUser, JwtValidator, Result as AuthErrorResult};

use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::debug;

const BEARER_PREFIX: &str = "Bearer ";

/// Turns `connect` credentials into a user.
///
/// With a validator, credentials must be a JWT (optionally prefixed with
/// `Bearer `) and the user is its `sub`. Without one, auth is disabled and the
/// credential string is taken as the user name, falling back to the
/// configured default user.
#[derive(Clone)]
pub struct Authenticator {
    validator: Option<Arc<JwtValidator>>,
    default_user: String,
}

impl Authenticator {
    pub fn new(validator: Option<Arc<JwtValidator>>, default_user: impl Into<String>) -> Self {
        Self {
            validator,
            default_user: default_user.into(),
        }
    }

    /// Auth disabled: every credential is accepted.
    pub fn disabled(default_user: impl Into<String>) -> Self {
        Self::new(None, default_user)
    }

    pub fn is_enabled(&self) -> bool {
        self.validator.is_some()
    }

    #[track_caller]
    pub fn authenticate(&self, credentials: Option<&str>) -> AuthErrorResult<AuthenticatedUser> {
        let credentials = credentials.map(str::trim).filter(|c| !c.is_empty());

        let Some(validator) = &self.validator else {
            let user = credentials.unwrap_or(&self.default_user);
            return Ok(AuthenticatedUser::new(user));
        };

        let credentials = credentials.ok_or_else(|| AuthError::MissingCredentials {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let token = match credentials.split_once(' ') {
            None => credentials,
            Some(_) => credentials.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
                AuthError::InvalidScheme {
                    location: ErrorLocation::from(Location::caller()),
                }
            })?,
        };

        let claims = validator.validate(token)?;
        debug!(
            "Authenticated {} via {}",
            claims.sub,
            validator.algorithm()
        );

        Ok(AuthenticatedUser {
            user: claims.sub,
            roles: claims.roles,
        })
    }
}
