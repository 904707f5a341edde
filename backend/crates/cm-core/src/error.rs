use crate::ErrorLocation;

use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Invalid dependency kind: {value} {location}")]
    InvalidDependencyKind {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid dependency key: {value} {location}")]
    InvalidDependencyKey {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid identity mapping for {key}: no target id and not flagged as new {location}")]
    InvalidMapping {
        key: String,
        location: ErrorLocation,
    },

    #[error("Invalid status value: {value} {location}")]
    InvalidStatus {
        value: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
