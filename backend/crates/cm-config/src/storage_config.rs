use crate::DEFAULT_ARCHIVE_DIRECTORY;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding archive containers, relative to the config dir
    pub archive_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            archive_dir: String::from(DEFAULT_ARCHIVE_DIRECTORY),
        }
    }
}
