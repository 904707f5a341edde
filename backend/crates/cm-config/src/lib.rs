mod auth_config;
mod config;
mod database_config;
mod error;
mod lock_config;
mod log_level;
mod logging_config;
mod repository_config;
mod server_config;
mod storage_config;

#[cfg(test)]
mod tests;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use lock_config::LockConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use repository_config::RepositoryConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8400;
const MIN_PORT: u16 = 1024;
const DEFAULT_DATABASE_FILENAME: &str = "migrator.db";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DATABASE_BUSY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_ARCHIVE_DIRECTORY: &str = "archives";
const DEFAULT_AUTH_ENABLED: bool = false;
const DEFAULT_USER: &str = "admin";
const MIN_JWT_SECRET_LENGTH: usize = 32;
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
/// Advisory lock hold time: 30 minutes
const DEFAULT_LOCK_HOLD_SECS: u64 = 30 * 60;
const MAX_LOCK_HOLD_SECS: u64 = 24 * 60 * 60;
const DEFAULT_SERVER_ADDRESS: &str = "localhost";
const DEFAULT_SERVER_BUILD: &str = "0";
