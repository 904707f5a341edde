use crate::{ArchiveSummary, DependencyKey, ImportPackage};

use serde::{Deserialize, Serialize};

/// Ordered packages to install from one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDescriptor {
    pub archive_ref: String,
    pub packages: Vec<ImportPackage>,
}

impl ImportDescriptor {
    /// Descriptor covering every package of an archive, in export order.
    pub fn from_summary(summary: &ArchiveSummary) -> Self {
        Self {
            archive_ref: summary.archive_ref.clone(),
            packages: summary
                .packages
                .iter()
                .map(|package| ImportPackage {
                    root: package.key.clone(),
                    name: package.name.clone(),
                    results: None,
                })
                .collect(),
        }
    }

    pub fn package(&self, root: &DependencyKey) -> Option<&ImportPackage> {
        self.packages.iter().find(|package| &package.root == root)
    }

    pub fn is_fully_validated(&self) -> bool {
        self.packages.iter().all(|package| package.results.is_some())
    }
}
