use crate::{DependencyKey, ValidationResult, ValidationStatus};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Validation outcome of every dependency in one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResults {
    pub package: DependencyKey,
    #[serde(default)]
    pub results: BTreeMap<DependencyKey, ValidationResult>,
}

impl ValidationResults {
    pub fn new(package: DependencyKey) -> Self {
        Self {
            package,
            results: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, result: ValidationResult) {
        self.results.insert(result.key.clone(), result);
    }

    pub fn get(&self, key: &DependencyKey) -> Option<&ValidationResult> {
        self.results.get(key)
    }

    /// Worst status across the package; an empty package passes.
    pub fn status(&self) -> ValidationStatus {
        self.results
            .values()
            .map(|result| result.status)
            .max()
            .unwrap_or(ValidationStatus::Pass)
    }

    pub fn has_failures(&self) -> bool {
        self.status() == ValidationStatus::Failed
    }

    pub fn absent_ancestors(&self) -> impl Iterator<Item = &DependencyKey> {
        self.results
            .values()
            .flat_map(|result| result.absent_ancestors.iter())
    }
}
