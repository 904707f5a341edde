use crate::{DependencyKey, DependencyKind, DependencyRef};

use serde::{Deserialize, Serialize};

/// What was exported for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDetail {
    pub key: DependencyKey,
    pub object_type: String,
    pub id: String,
    pub name: String,
    pub kind: DependencyKind,

    /// Root of the package that first reached this object
    pub package: DependencyKey,

    #[serde(default)]
    pub ancestors: Vec<DependencyRef>,

    /// Path of the payload inside the container
    pub entry: String,

    /// Install order across the whole archive
    pub sequence: u32,
}

impl ArchiveDetail {
    pub fn to_ref(&self) -> DependencyRef {
        DependencyRef::new(self.object_type.clone(), self.id.clone())
    }
}
