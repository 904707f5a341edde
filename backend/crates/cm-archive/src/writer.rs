use crate::{
    ArchiveError, ArchiveManifest, DETAILS_ENTRY, INFO_ENTRY, MANIFEST_ENTRY, ManifestPackage,
    Result as ArchiveErrorResult, archive_file_name,
};

use cm_core::{ArchiveDetail, ArchiveInfo, ArchiveSummary, Dependency, DependencyKey, DependencyRef};

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};

use error_location::ErrorLocation;
use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes one archive into a private temp file in the archive directory.
///
/// [`finish`](Self::finish) renames the temp file onto `<name>.zip`
/// atomically, so readers never see a half-written archive and concurrent
/// exports of the same name do not interleave (the last to finish wins).
/// Dropping the writer without finishing removes the temp file.
pub struct ArchiveWriter {
    zip: Option<ZipWriter<File>>,
    options: SimpleFileOptions,
    temp_path: PathBuf,
    /// Set once the temp file has been renamed onto `final_path`.
    renamed: bool,
    final_path: PathBuf,
    archive_ref: String,
    details: Vec<ArchiveDetail>,
    written: HashSet<DependencyKey>,
    manifest: ArchiveManifest,
}

impl ArchiveWriter {
    pub fn create(archive_dir: &Path, name: &str) -> ArchiveErrorResult<Self> {
        let archive_ref = archive_file_name(name)?;

        std::fs::create_dir_all(archive_dir).map_err(|e| io_error(archive_dir, e))?;

        let temp_path = archive_dir.join(format!(".{}.{}.partial", archive_ref, Uuid::new_v4()));
        let file = File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;

        debug!("Writing archive {} via {}", archive_ref, temp_path.display());

        Ok(Self {
            zip: Some(ZipWriter::new(file)),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            temp_path,
            renamed: false,
            final_path: archive_dir.join(&archive_ref),
            archive_ref,
            details: Vec::new(),
            written: HashSet::new(),
            manifest: ArchiveManifest::default(),
        })
    }

    pub fn archive_ref(&self) -> &str {
        &self.archive_ref
    }

    /// Start a new package; subsequent objects are listed under it.
    pub fn begin_package(&mut self, root: &DependencyKey, name: &str) {
        self.manifest.packages.push(ManifestPackage {
            key: root.clone(),
            name: name.to_string(),
            objects: Vec::new(),
        });
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.written.contains(key)
    }

    pub fn object_count(&self) -> usize {
        self.details.len()
    }

    /// Append one object to the current package.
    ///
    /// Returns `false` without writing if the object is already in the
    /// archive.
    pub fn add_object(
        &mut self,
        dependency: &Dependency,
        package: &DependencyKey,
        ancestors: Vec<DependencyRef>,
        payload: &[u8],
    ) -> ArchiveErrorResult<bool> {
        let key = dependency.key();
        if self.written.contains(&key) {
            return Ok(false);
        }

        let sequence = self.details.len() as u32;
        let entry = format!("objects/{:06}.dat", sequence);

        let options = self.options;
        let zip = self.zip_mut()?;
        zip.start_file(entry.as_str(), options).map_err(zip_error)?;
        zip.write_all(payload).map_err(|e| io_error(&self.temp_path, e))?;

        if let Some(current) = self.manifest.packages.last_mut() {
            current.objects.push(key.clone());
        }

        self.details.push(ArchiveDetail {
            key: key.clone(),
            object_type: dependency.object_type.clone(),
            id: dependency.id.clone(),
            name: dependency.name.clone(),
            kind: dependency.kind,
            package: package.clone(),
            ancestors,
            entry,
            sequence,
        });
        self.written.insert(key);

        Ok(true)
    }

    /// Write metadata, manifest and details, then move the archive into place.
    pub fn finish(mut self, info: &ArchiveInfo) -> ArchiveErrorResult<ArchiveSummary> {
        self.write_json(INFO_ENTRY, info)?;
        self.write_json(MANIFEST_ENTRY, &self.manifest.clone())?;
        self.write_json(DETAILS_ENTRY, &self.details.clone())?;

        let zip = self.zip.take().ok_or_else(|| ArchiveError::MissingEntry {
            entry: self.archive_ref.clone(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let file = zip.finish().map_err(zip_error)?;
        file.sync_all().map_err(|e| io_error(&self.temp_path, e))?;
        drop(file);

        std::fs::rename(&self.temp_path, &self.final_path)
            .map_err(|e| io_error(&self.final_path, e))?;
        self.renamed = true;

        debug!(
            "Archive {} finished: {} packages, {} objects",
            self.archive_ref,
            self.manifest.packages.len(),
            self.details.len()
        );

        Ok(ArchiveSummary {
            archive_ref: self.archive_ref.clone(),
            info: info.clone(),
            packages: self.manifest.summaries(),
            object_count: self.details.len(),
        })
    }

    /// Abandon the archive and remove the temp file.
    pub fn discard(self) {
        // Drop does the cleanup.
    }

    fn write_json<T: Serialize>(&mut self, entry: &str, value: &T) -> ArchiveErrorResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| ArchiveError::Json {
            entry: entry.to_string(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let options = self.options;
        let zip = self.zip_mut()?;
        zip.start_file(entry, options).map_err(zip_error)?;
        zip.write_all(&bytes).map_err(|e| io_error(&self.temp_path, e))?;

        Ok(())
    }

    #[track_caller]
    fn zip_mut(&mut self) -> ArchiveErrorResult<&mut ZipWriter<File>> {
        self.zip.as_mut().ok_or_else(|| ArchiveError::MissingEntry {
            entry: self.archive_ref.clone(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Drop for ArchiveWriter {
    fn drop(&mut self) {
        drop(self.zip.take());
        if self.renamed {
            return;
        }
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove partial archive {}: {}",
                self.temp_path.display(),
                e
            ),
        }
    }
}

#[track_caller]
pub(crate) fn io_error(path: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: path.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
pub(crate) fn zip_error(source: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Zip {
        source,
        location: ErrorLocation::from(Location::caller()),
    }
}
