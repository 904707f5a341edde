use crate::ErrorLocation;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjectModelError {
    #[error("Object not found: {key} {location}")]
    NotFound {
        key: String,
        location: ErrorLocation,
    },

    #[error("Object incompatible with target: {message} {location}")]
    Incompatible {
        message: String,
        location: ErrorLocation,
    },

    #[error("Object store error: {message} {location}")]
    Storage {
        message: String,
        location: ErrorLocation,
    },
}

impl ObjectModelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ObjectModelError>;
