use error_location::ErrorLocation;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error on {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Zip error: {source} {location}")]
    Zip {
        #[source]
        source: zip::result::ZipError,
        location: ErrorLocation,
    },

    #[error("Malformed {entry}: {source} {location}")]
    Json {
        entry: String,
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Archive not found: {archive_ref} {location}")]
    NotFound {
        archive_ref: String,
        location: ErrorLocation,
    },

    #[error("Invalid archive name '{name}' {location}")]
    InvalidName {
        name: String,
        location: ErrorLocation,
    },

    #[error("Archive entry missing: {entry} {location}")]
    MissingEntry {
        entry: String,
        location: ErrorLocation,
    },

    #[error("Unsupported archive format version {found} (supported: {supported}) {location}")]
    UnsupportedFormat {
        found: u32,
        supported: u32,
        location: ErrorLocation,
    },

    #[error("Archive built on server build {archive_build}, target is {target_build} {location}")]
    BuildMismatch {
        archive_build: String,
        target_build: String,
        location: ErrorLocation,
    },
}

impl ArchiveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_compatibility(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::BuildMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
