use crate::{DependencyKey, DependencyKind, DependencyRef};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub object_type: String,
    pub id: String,
    pub name: String,
    pub kind: DependencyKind,

    /// Direct children, in the order the object model reported them.
    #[serde(default)]
    pub children: Vec<DependencyRef>,
}

impl Dependency {
    pub fn new(
        object_type: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            id: id.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DependencyRef>) -> Self {
        self.children = children;
        self
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(&self.object_type, &self.id)
    }

    pub fn to_ref(&self) -> DependencyRef {
        DependencyRef::new(self.object_type.clone(), self.id.clone())
    }
}
