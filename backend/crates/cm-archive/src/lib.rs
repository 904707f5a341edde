//! On-disk archive container.
//!
//! An archive is a zip file named `<descriptor>.zip` holding:
//!
//! - `META-INF/archive-info.json`: [`cm_core::ArchiveInfo`]
//! - `manifest.json`: packages and the keys each one shipped
//! - `details.json`: one [`cm_core::ArchiveDetail`] per object, in install order
//! - `objects/<sequence>.dat`: opaque object payloads

pub mod compatibility;
pub mod error;
pub mod listing;
pub mod manifest;
pub mod reader;
pub mod writer;

pub use compatibility::check_compatibility;
pub use error::{ArchiveError, Result};
pub use listing::{archive_file_name, list_archives};
pub use manifest::{ArchiveManifest, ManifestPackage};
pub use reader::ArchiveReader;
pub use writer::ArchiveWriter;

pub(crate) const INFO_ENTRY: &str = "META-INF/archive-info.json";
pub(crate) const MANIFEST_ENTRY: &str = "manifest.json";
pub(crate) const DETAILS_ENTRY: &str = "details.json";
pub(crate) const ARCHIVE_EXTENSION: &str = "zip";

#[cfg(test)]
mod tests;
