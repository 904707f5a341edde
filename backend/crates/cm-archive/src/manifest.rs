use cm_core::{ArchivePackageSummary, DependencyKey};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveManifest {
    pub packages: Vec<ManifestPackage>,
}

/// One package and the objects written for it, in install order.
///
/// An object reached from several packages is listed only under the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPackage {
    pub key: DependencyKey,
    pub name: String,
    pub objects: Vec<DependencyKey>,
}

impl ArchiveManifest {
    pub fn object_count(&self) -> usize {
        self.packages.iter().map(|p| p.objects.len()).sum()
    }

    pub fn summaries(&self) -> Vec<ArchivePackageSummary> {
        self.packages
            .iter()
            .map(|package| ArchivePackageSummary {
                key: package.key.clone(),
                name: package.name.clone(),
                object_count: package.objects.len(),
            })
            .collect()
    }
}
