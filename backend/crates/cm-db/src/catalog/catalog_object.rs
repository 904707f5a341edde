use cm_core::{Dependency, DependencyKey, DependencyKind, DependencyRef};

use serde::{Deserialize, Serialize};

/// One row of the object catalogue, and the payload format it exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogObject {
    pub object_type: String,
    pub object_id: String,
    pub name: String,
    pub kind: DependencyKind,
    pub payload: String,

    #[serde(default)]
    pub children: Vec<DependencyRef>,

    #[serde(default)]
    pub ancestors: Vec<DependencyRef>,
}

impl CatalogObject {
    pub fn new(
        object_type: impl Into<String>,
        object_id: impl Into<String>,
        name: impl Into<String>,
        kind: DependencyKind,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
            name: name.into(),
            kind,
            payload: payload.into(),
            children: Vec::new(),
            ancestors: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DependencyRef>) -> Self {
        self.children = children;
        self
    }

    pub fn with_ancestors(mut self, ancestors: Vec<DependencyRef>) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(&self.object_type, &self.object_id)
    }

    pub fn to_dependency(&self) -> Dependency {
        Dependency::new(
            self.object_type.clone(),
            self.object_id.clone(),
            self.name.clone(),
            self.kind,
        )
        .with_children(self.children.clone())
    }
}
