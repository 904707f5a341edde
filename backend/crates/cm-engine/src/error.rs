use cm_archive::ArchiveError;
use cm_core::{CoreError, ErrorLocation, ObjectModelError};
use cm_db::DbError;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cannot resolve dependency {key}: {message} {location}")]
    Resolution {
        key: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Export descriptor not found: {name} {location}")]
    DescriptorNotFound {
        name: String,
        location: ErrorLocation,
    },

    #[error("Invalid export descriptor: {source} {location}")]
    InvalidDescriptor {
        source: CoreError,
        location: ErrorLocation,
    },

    #[error("Publisher lock is held by another import {location}")]
    PublisherLockUnavailable { location: ErrorLocation },

    #[error("Job not found: {job_id} {location}")]
    JobNotFound {
        job_id: String,
        location: ErrorLocation,
    },

    #[error("Operation cancelled {location}")]
    Cancelled { location: ErrorLocation },

    #[error("Object model error: {source} {location}")]
    ObjectModel {
        source: ObjectModelError,
        location: ErrorLocation,
    },

    #[error("Archive error: {source} {location}")]
    Archive {
        source: ArchiveError,
        location: ErrorLocation,
    },

    #[error("Database error: {source} {location}")]
    Db {
        source: DbError,
        location: ErrorLocation,
    },
}

impl EngineError {
    #[track_caller]
    pub fn cancelled() -> Self {
        Self::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn resolution(key: impl ToString, source: &ObjectModelError) -> Self {
        Self::Resolution {
            key: key.to_string(),
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ObjectModelError> for EngineError {
    #[track_caller]
    fn from(source: ObjectModelError) -> Self {
        Self::ObjectModel {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ArchiveError> for EngineError {
    #[track_caller]
    fn from(source: ArchiveError) -> Self {
        Self::Archive {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for EngineError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Db {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
