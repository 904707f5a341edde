use crate::writer::{io_error, zip_error};
use crate::{
    ArchiveError, ArchiveManifest, DETAILS_ENTRY, INFO_ENTRY, MANIFEST_ENTRY,
    Result as ArchiveErrorResult, archive_file_name,
};

use cm_core::{ArchiveDetail, ArchiveInfo, ArchiveSummary, DependencyKey};

use std::fs::File;
use std::io::Read;
use std::panic::Location;
use std::path::Path;

use error_location::ErrorLocation;
use serde::de::DeserializeOwned;
use zip::ZipArchive;
use zip::result::ZipError;

/// Read access to a finished archive.
///
/// Metadata, manifest and details are loaded eagerly on open; payloads are
/// read on demand.
pub struct ArchiveReader {
    archive_ref: String,
    zip: ZipArchive<File>,
    info: ArchiveInfo,
    manifest: ArchiveManifest,
    details: Vec<ArchiveDetail>,
}

impl ArchiveReader {
    pub fn open(archive_dir: &Path, archive_ref: &str) -> ArchiveErrorResult<Self> {
        let archive_ref = archive_file_name(archive_ref)?;
        let path = archive_dir.join(&archive_ref);

        if !path.is_file() {
            return Err(ArchiveError::NotFound {
                archive_ref,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let file = File::open(&path).map_err(|e| io_error(&path, e))?;
        let mut zip = ZipArchive::new(file).map_err(zip_error)?;

        let info: ArchiveInfo = read_json(&mut zip, INFO_ENTRY)?;
        let manifest: ArchiveManifest = read_json(&mut zip, MANIFEST_ENTRY)?;
        let mut details: Vec<ArchiveDetail> = read_json(&mut zip, DETAILS_ENTRY)?;
        details.sort_by_key(|detail| detail.sequence);

        Ok(Self {
            archive_ref,
            zip,
            info,
            manifest,
            details,
        })
    }

    pub fn archive_ref(&self) -> &str {
        &self.archive_ref
    }

    pub fn info(&self) -> &ArchiveInfo {
        &self.info
    }

    pub fn manifest(&self) -> &ArchiveManifest {
        &self.manifest
    }

    /// Every shipped object, in install order.
    pub fn details(&self) -> &[ArchiveDetail] {
        &self.details
    }

    /// Objects written for one package, in install order.
    pub fn package_details(&self, root: &DependencyKey) -> Vec<&ArchiveDetail> {
        self.details
            .iter()
            .filter(|detail| &detail.package == root)
            .collect()
    }

    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary {
            archive_ref: self.archive_ref.clone(),
            info: self.info.clone(),
            packages: self.manifest.summaries(),
            object_count: self.details.len(),
        }
    }

    pub fn read_object(&mut self, detail: &ArchiveDetail) -> ArchiveErrorResult<Vec<u8>> {
        read_entry(&mut self.zip, &detail.entry)
    }
}

fn read_entry(zip: &mut ZipArchive<File>, entry: &str) -> ArchiveErrorResult<Vec<u8>> {
    let mut file = zip.by_name(entry).map_err(|e| match e {
        ZipError::FileNotFound => ArchiveError::MissingEntry {
            entry: entry.to_string(),
            location: ErrorLocation::from(Location::caller()),
        },
        other => zip_error(other),
    })?;

    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).map_err(|e| io_error(Path::new(entry), e))?;

    Ok(buffer)
}

fn read_json<T: DeserializeOwned>(zip: &mut ZipArchive<File>, entry: &str) -> ArchiveErrorResult<T> {
    let bytes = read_entry(zip, entry)?;
    serde_json::from_slice(&bytes).map_err(|e| ArchiveError::Json {
        entry: entry.to_string(),
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })
}
