use crate::{DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_BUILD};

use serde::Deserialize;

/// Identity of this server and its object repository, stamped into every
/// archive it exports and compared against every archive it imports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository identity; generated and persisted on first start if unset
    pub id: Option<String>,
    pub server_address: String,
    pub server_version: String,
    pub server_build: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            id: None,
            server_address: String::from(DEFAULT_SERVER_ADDRESS),
            server_version: String::from(env!("CARGO_PKG_VERSION")),
            server_build: String::from(DEFAULT_SERVER_BUILD),
        }
    }
}
