use crate::DependencyKey;

use serde::{Deserialize, Serialize};

/// Reference to an object by type and id, without its payload or children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
    pub object_type: String,
    pub id: String,
}

impl DependencyRef {
    pub fn new(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            id: id.into(),
        }
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(&self.object_type, &self.id)
    }
}

impl From<&DependencyKey> for DependencyRef {
    fn from(key: &DependencyKey) -> Self {
        Self::new(key.object_type(), key.id())
    }
}
