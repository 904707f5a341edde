use crate::{
    AuthConfig, ConfigError, ConfigErrorResult, DatabaseConfig, LockConfig, LoggingConfig,
    RepositoryConfig, ServerConfig, StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub lock: LockConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub repository: RepositoryConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for CM_CONFIG_DIR env var, else use ./.cm/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply CM_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: CM_CONFIG_DIR env var > ./.cm/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var("CM_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".cm"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let config_dir = Self::config_dir()?;

        self.server.validate()?;
        self.lock.validate()?;
        self.auth.validate(&config_dir)?;

        self.database.validate()?;

        if self.storage.archive_dir.is_empty() || !is_contained(&self.storage.archive_dir) {
            return Err(ConfigError::storage(
                "storage.archive_dir must be a non-empty relative path without '..'",
            ));
        }

        if let Some(id) = &self.repository.id
            && id.trim().is_empty()
        {
            return Err(ConfigError::config("repository.id cannot be blank"));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(self.database.resolve(&Self::config_dir()?))
    }

    /// Get absolute path to the archive directory.
    pub fn archive_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.storage.archive_dir))
    }

    /// Get absolute path to the log directory.
    pub fn log_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.logging.dir))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  database: {} (pool {}, busy timeout {}s)",
            self.database.path, self.database.max_connections, self.database.busy_timeout_secs
        );
        info!("  storage: archives in {}", self.storage.archive_dir);
        info!("  lock: hold={}s", self.lock.hold_secs);

        let auth_type = if self.auth.jwt_secret.is_some() {
            "HS256"
        } else if self.auth.jwt_public_key_path.is_some() {
            "RS256"
        } else {
            "none"
        };

        info!(
            "  auth: {} ({})",
            if self.auth.enabled {
                "enabled"
            } else {
                "disabled"
            },
            auth_type
        );

        info!(
            "  logging: {} (colored: {})",
            self.logging.level, self.logging.colored
        );

        info!(
            "  repository: {} at {} (version {}, build {})",
            self.repository.id.as_deref().unwrap_or("<generated>"),
            self.repository.server_address,
            self.repository.server_version,
            self.repository.server_build
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("CM_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("CM_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("CM_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse("CM_DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);

        // Storage
        Self::apply_env_string("CM_ARCHIVE_DIR", &mut self.storage.archive_dir);

        // Lock
        Self::apply_env_parse("CM_LOCK_HOLD_SECS", &mut self.lock.hold_secs);

        // Auth
        Self::apply_env_bool("CM_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("CM_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_option_string(
            "CM_AUTH_JWT_PUBLIC_KEY_PATH",
            &mut self.auth.jwt_public_key_path,
        );
        Self::apply_env_string("CM_AUTH_DEFAULT_USER", &mut self.auth.default_user);

        // Logging
        Self::apply_env_parse("CM_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("CM_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_string("CM_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_string("CM_LOG_FILE", &mut self.logging.file);

        // Repository
        Self::apply_env_option_string("CM_REPOSITORY_ID", &mut self.repository.id);
        Self::apply_env_string(
            "CM_SERVER_ADDRESS",
            &mut self.repository.server_address,
        );
        Self::apply_env_string("CM_SERVER_BUILD", &mut self.repository.server_build);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}

pub(crate) fn is_contained(path: &str) -> bool {
    !Path::new(path).is_absolute() && !path.contains("..")
}
