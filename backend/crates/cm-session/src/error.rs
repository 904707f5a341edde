use crate::error_codes;

use cm_archive::ArchiveError;
use cm_auth::AuthError;
use cm_core::{CoreError, ErrorLocation, ObjectModelError};
use cm_db::DbError;
use cm_engine::EngineError;

use std::collections::BTreeMap;
use std::panic::Location;

use serde_json::Value;
use thiserror::Error;

/// HTTP status for every failure; the error kind travels in `code` and `args`.
pub const STATUS_FAILURE: u16 = 500;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Malformed request: {message} {location}")]
    MalformedRequest {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Unknown request tag: {tag} {location}")]
    UnknownRequest {
        tag: String,
        location: ErrorLocation,
    },

    #[error("Session not found: {session_id} {location}")]
    SessionNotFound {
        session_id: String,
        location: ErrorLocation,
    },

    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Locked by {holder} for another {remaining_secs}s {location}")]
    LockedByOther {
        holder: String,
        remaining_secs: u64,
        location: ErrorLocation,
    },

    #[error("Lock lost: it expired or was never held {location}")]
    LockLost { location: ErrorLocation },

    #[error("Request timed out after {secs}s {location}")]
    Timeout { secs: u64, location: ErrorLocation },

    #[error("Authentication failed: {source} {location}")]
    Auth {
        source: AuthError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Engine {
        source: EngineError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Db {
        source: DbError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Archive {
        source: ArchiveError,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    ObjectModel {
        source: ObjectModelError,
        location: ErrorLocation,
    },
}

impl SessionError {
    #[track_caller]
    pub fn malformed(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            field: field.map(str::to_string),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedRequest { .. } => error_codes::MALFORMED_REQUEST,
            Self::UnknownRequest { .. } => error_codes::UNKNOWN_REQUEST,
            Self::SessionNotFound { .. } => error_codes::SESSION_NOT_FOUND,
            Self::NotFound { .. } => error_codes::NOT_FOUND,
            Self::LockedByOther { .. } => error_codes::LOCKED_BY_OTHER,
            Self::LockLost { .. } => error_codes::LOCK_LOST,
            Self::Timeout { .. } => error_codes::TIMEOUT,
            Self::Auth { .. } => error_codes::UNAUTHORIZED,
            Self::Engine { source, .. } => engine_code(source),
            Self::Db { source, .. } => db_code(source),
            Self::Archive { source, .. } => archive_code(source),
            Self::ObjectModel { source, .. } => object_model_code(source),
        }
    }

    pub fn status(&self) -> u16 {
        STATUS_FAILURE
    }

    /// Structured values a client needs to render the error.
    pub fn args(&self) -> BTreeMap<String, Value> {
        let mut args = BTreeMap::new();
        match self {
            Self::LockedByOther {
                holder,
                remaining_secs,
                ..
            } => {
                args.insert("holder".to_string(), Value::from(holder.as_str()));
                args.insert("remaining_secs".to_string(), Value::from(*remaining_secs));
            }
            Self::MalformedRequest {
                field: Some(field), ..
            } => {
                args.insert("field".to_string(), Value::from(field.as_str()));
            }
            Self::UnknownRequest { tag, .. } => {
                args.insert("tag".to_string(), Value::from(tag.as_str()));
            }
            Self::SessionNotFound { session_id, .. } => {
                args.insert("session_id".to_string(), Value::from(session_id.as_str()));
            }
            _ => {}
        }
        args
    }
}

fn engine_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::DescriptorNotFound { .. } | EngineError::JobNotFound { .. } => {
            error_codes::NOT_FOUND
        }
        EngineError::PublisherLockUnavailable { .. } => error_codes::PUBLISHER_LOCK_UNAVAILABLE,
        EngineError::Resolution { .. } => error_codes::RESOLUTION_ERROR,
        EngineError::InvalidDescriptor { .. } => error_codes::VALIDATION_ERROR,
        EngineError::Archive { source, .. } => archive_code(source),
        EngineError::Db { source, .. } => db_code(source),
        EngineError::ObjectModel { source, .. } => object_model_code(source),
        EngineError::Cancelled { .. } => error_codes::INTERNAL_ERROR,
    }
}

fn db_code(error: &DbError) -> &'static str {
    match error {
        DbError::DuplicateIdMap { .. } => error_codes::DUPLICATE_ID_MAP,
        DbError::InvalidMapping { .. } => error_codes::INVALID_MAPPING,
        DbError::Core {
            source: CoreError::Validation { .. },
            ..
        } => error_codes::VALIDATION_ERROR,
        _ => error_codes::INTERNAL_ERROR,
    }
}

fn archive_code(error: &ArchiveError) -> &'static str {
    if error.is_not_found() {
        error_codes::NOT_FOUND
    } else if error.is_compatibility() {
        error_codes::COMPATIBILITY_ERROR
    } else if matches!(error, ArchiveError::InvalidName { .. }) {
        error_codes::MALFORMED_REQUEST
    } else {
        error_codes::INTERNAL_ERROR
    }
}

fn object_model_code(error: &ObjectModelError) -> &'static str {
    if error.is_not_found() {
        error_codes::NOT_FOUND
    } else {
        error_codes::INTERNAL_ERROR
    }
}

impl From<AuthError> for SessionError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        Self::Auth {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<EngineError> for SessionError {
    #[track_caller]
    fn from(source: EngineError) -> Self {
        Self::Engine {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for SessionError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Db {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ArchiveError> for SessionError {
    #[track_caller]
    fn from(source: ArchiveError) -> Self {
        Self::Archive {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ObjectModelError> for SessionError {
    #[track_caller]
    fn from(source: ObjectModelError) -> Self {
        Self::ObjectModel {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
