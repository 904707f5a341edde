use crate::{DependencyKey, IdentityMapping, Result as CoreErrorResult};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// All identity mappings known for one source server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityMap {
    pub source_server: String,

    #[serde(default)]
    pub mappings: BTreeMap<DependencyKey, IdentityMapping>,
}

impl IdentityMap {
    pub fn new(source_server: impl Into<String>) -> Self {
        Self {
            source_server: source_server.into(),
            mappings: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn get(&self, key: &DependencyKey) -> Option<&IdentityMapping> {
        self.mappings.get(key)
    }

    /// Target id a source key resolves to, if one has been assigned.
    pub fn target_id(&self, key: &DependencyKey) -> Option<&str> {
        self.mappings
            .get(key)
            .and_then(|mapping| mapping.target_id.as_deref())
    }

    /// Insert or replace the mapping for its source key.
    pub fn insert(&mut self, mapping: IdentityMapping) -> Option<IdentityMapping> {
        self.mappings.insert(mapping.key(), mapping)
    }

    /// Record the id the target assigned to a source object.
    ///
    /// Returns `false` when the key has no mapping yet.
    pub fn resolve(&mut self, key: &DependencyKey, target_id: impl Into<String>) -> bool {
        match self.mappings.get_mut(key) {
            Some(mapping) => {
                mapping.target_id = Some(target_id.into());
                true
            }
            None => false,
        }
    }

    /// Check every mapping; the first invalid one is reported.
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        for mapping in self.mappings.values() {
            mapping.validate()?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdentityMapping> {
        self.mappings.values()
    }
}
