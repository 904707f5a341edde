use crate::{DependencyKey, ImportDescriptor, ValidationResult, ValidationResults};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// State shared across all packages of one import descriptor while it is
/// being validated.
#[derive(Debug, Default)]
pub struct ValidationContext {
    validated: HashSet<DependencyKey>,
    results: HashMap<DependencyKey, ValidationResults>,
    absent_ancestors: BTreeMap<DependencyKey, BTreeSet<DependencyKey>>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with any results already attached to the descriptor.
    pub fn from_descriptor(descriptor: &ImportDescriptor) -> Self {
        let mut context = Self::new();
        for package in &descriptor.packages {
            if let Some(results) = &package.results {
                context.store_results(results.clone());
            }
        }
        context
    }

    /// Whether a result is already stored for this package root.
    pub fn already_validated(&self, package: &DependencyKey) -> bool {
        self.results.contains_key(package)
    }

    pub fn is_dependency_validated(&self, key: &DependencyKey) -> bool {
        self.validated.contains(key)
    }

    pub fn mark_validated(&mut self, key: DependencyKey) {
        self.validated.insert(key);
    }

    pub fn store_results(&mut self, results: ValidationResults) {
        for key in results.results.keys() {
            self.validated.insert(key.clone());
        }
        self.results.insert(results.package.clone(), results);
    }

    /// Result computed for a dependency under any package seen so far.
    pub fn dependency_result(&self, key: &DependencyKey) -> Option<&ValidationResult> {
        self.results.values().find_map(|results| results.get(key))
    }

    pub fn record_absent_ancestor(&mut self, dependency: DependencyKey, ancestor: DependencyKey) {
        self.absent_ancestors
            .entry(dependency)
            .or_default()
            .insert(ancestor);
    }

    /// Dependency key to the ancestors it needs that were not shipped.
    pub fn absent_ancestors(&self) -> &BTreeMap<DependencyKey, BTreeSet<DependencyKey>> {
        &self.absent_ancestors
    }

    /// Attach every stored result to its package in `descriptor`.
    pub fn apply_to(&self, descriptor: &mut ImportDescriptor) {
        for package in &mut descriptor.packages {
            if let Some(results) = self.results.get(&package.root) {
                package.results = Some(results.clone());
            }
        }
    }
}
