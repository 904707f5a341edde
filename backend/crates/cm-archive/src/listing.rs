use crate::{ARCHIVE_EXTENSION, ArchiveError, ArchiveReader, Result as ArchiveErrorResult};

use cm_core::ArchiveSummary;

use std::panic::Location;
use std::path::Path;

use error_location::ErrorLocation;
use log::warn;

/// File name of the archive for a descriptor: `<name>.zip`.
///
/// Names must be plain file names; separators and `..` are rejected.
#[track_caller]
pub fn archive_file_name(name: &str) -> ArchiveErrorResult<String> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.contains(['/', '\\'])
        || trimmed.contains("..");

    if invalid {
        return Err(ArchiveError::InvalidName {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let suffix = format!(".{}", ARCHIVE_EXTENSION);
    if trimmed.ends_with(&suffix) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", trimmed, suffix))
    }
}

/// Summaries of every readable archive in `archive_dir`, sorted by name.
///
/// In-progress temp files are ignored; unreadable archives are logged and
/// skipped.
pub fn list_archives(archive_dir: &Path) -> ArchiveErrorResult<Vec<ArchiveSummary>> {
    if !archive_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(archive_dir).map_err(|e| ArchiveError::Io {
        path: archive_dir.to_path_buf(),
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| {
            !name.starts_with('.')
                && Path::new(name).extension().and_then(|e| e.to_str()) == Some(ARCHIVE_EXTENSION)
        })
        .collect();
    names.sort();

    let mut summaries = Vec::with_capacity(names.len());
    for name in names {
        match ArchiveReader::open(archive_dir, &name) {
            Ok(reader) => summaries.push(reader.summary()),
            Err(e) => warn!("Skipping unreadable archive {}: {}", name, e),
        }
    }

    Ok(summaries)
}
