use crate::{ArchiveError, Result as ArchiveErrorResult};

use cm_core::{ARCHIVE_FORMAT_VERSION, ArchiveInfo};

use std::panic::Location;

use error_location::ErrorLocation;

/// Check an archive can be imported by this server.
///
/// An unsupported format version is always an error. A server build that
/// differs from `target_build` is a warning when `warn_on_build_mismatch` is
/// set and an error otherwise. Returns the warnings.
#[track_caller]
pub fn check_compatibility(
    info: &ArchiveInfo,
    target_build: &str,
    warn_on_build_mismatch: bool,
) -> ArchiveErrorResult<Vec<String>> {
    if info.format_version == 0 || info.format_version > ARCHIVE_FORMAT_VERSION {
        return Err(ArchiveError::UnsupportedFormat {
            found: info.format_version,
            supported: ARCHIVE_FORMAT_VERSION,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut warnings = Vec::new();

    if info.server_build != target_build {
        if !warn_on_build_mismatch {
            return Err(ArchiveError::BuildMismatch {
                archive_build: info.server_build.clone(),
                target_build: target_build.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        warnings.push(format!(
            "Archive was exported from server build {}, this server is build {}",
            info.server_build, target_build
        ));
    }

    if !info.complete {
        warnings.push(format!(
            "Export of '{}' was cancelled; archive holds only part of the descriptor",
            info.descriptor_name
        ));
    }

    Ok(warnings)
}
