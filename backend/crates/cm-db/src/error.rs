use cm_core::{CoreError, ErrorLocation};

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Serialization error: {source} {location}")]
    Serialization {
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Corrupt row in {table}: {message} {location}")]
    CorruptRow {
        table: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Duplicate identity maps for source server {source_server}: {count} rows {location}")]
    DuplicateIdMap {
        source_server: String,
        count: i64,
        location: ErrorLocation,
    },

    #[error("Invalid identity mapping for {key} {location}")]
    InvalidMapping {
        key: String,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Core {
        source: CoreError,
        location: ErrorLocation,
    },
}

impl DbError {
    #[track_caller]
    pub fn corrupt_row(table: &'static str, message: impl Into<String>) -> Self {
        Self::CorruptRow {
            table,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for DbError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match source {
            CoreError::InvalidMapping { key, .. } => Self::InvalidMapping { key, location },
            source => Self::Core { source, location },
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
