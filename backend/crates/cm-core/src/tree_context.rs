//! Per-operation record of which dependency keys are in play.
//!
//! Inclusion is monotonic: once a key is included it stays included for
//! the lifetime of the context. Resolution relies on this to terminate on
//! cyclic graphs, so the "already known" check is part of correctness.

use crate::{DependencyKey, DependencyRef};

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Keys for which this returns `true` are recorded but never packaged.
pub type SuppressionPredicate = Box<dyn Fn(&DependencyKey) -> bool + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeEntry {
    pub included: bool,
    pub suppressed: bool,
    pub ancestors: BTreeSet<DependencyKey>,

    /// Included keys first reached through this entry, in visit order
    pub children: Vec<DependencyKey>,

    /// Root of the package that first reached this key
    pub package: Option<DependencyKey>,
}

/// Result of offering a key to the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Included,
    Suppressed,
    AlreadyKnown,
}

#[derive(Default)]
pub struct TreeContext {
    entries: HashMap<DependencyKey, TreeEntry>,
    order: Vec<DependencyKey>,
    suppression: Option<SuppressionPredicate>,
}

impl TreeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suppression(suppression: SuppressionPredicate) -> Self {
        Self {
            suppression: Some(suppression),
            ..Self::default()
        }
    }

    /// Suppress a fixed set of keys.
    pub fn with_exclusions(exclusions: impl IntoIterator<Item = DependencyKey>) -> Self {
        let excluded: BTreeSet<DependencyKey> = exclusions.into_iter().collect();
        if excluded.is_empty() {
            return Self::new();
        }
        Self::with_suppression(Box::new(move |key| excluded.contains(key)))
    }

    /// Seed a package root as included. Roots bypass suppression.
    ///
    /// Returns `false` if the root was already included.
    pub fn add_package(&mut self, root: &DependencyKey) -> bool {
        let entry = self.entries.entry(root.clone()).or_default();
        if entry.included {
            return false;
        }
        entry.included = true;
        entry.suppressed = false;
        entry.package = Some(root.clone());
        self.order.push(root.clone());
        true
    }

    /// Offer a newly discovered key reached from `parent`.
    pub fn include(&mut self, key: &DependencyKey, parent: &DependencyKey) -> Inclusion {
        if self.entries.contains_key(key) {
            return Inclusion::AlreadyKnown;
        }

        let package = self
            .entries
            .get(parent)
            .and_then(|entry| entry.package.clone())
            .unwrap_or_else(|| parent.clone());

        if self.is_suppressed_by_policy(key) {
            self.entries.insert(
                key.clone(),
                TreeEntry {
                    suppressed: true,
                    package: Some(package),
                    ..TreeEntry::default()
                },
            );
            return Inclusion::Suppressed;
        }

        self.entries.insert(
            key.clone(),
            TreeEntry {
                included: true,
                package: Some(package),
                ..TreeEntry::default()
            },
        );
        self.order.push(key.clone());
        if let Some(parent_entry) = self.entries.get_mut(parent) {
            parent_entry.children.push(key.clone());
        }
        Inclusion::Included
    }

    /// Mark a key included directly, e.g. when rebuilding from an archive.
    pub fn insert_included(&mut self, key: DependencyKey, package: DependencyKey) {
        let entry = self.entries.entry(key.clone()).or_default();
        if !entry.included {
            entry.included = true;
            entry.package = Some(package);
            self.order.push(key);
        }
    }

    pub fn add_ancestors<'a>(
        &mut self,
        key: &DependencyKey,
        ancestors: impl IntoIterator<Item = &'a DependencyRef>,
    ) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry
            .ancestors
            .extend(ancestors.into_iter().map(DependencyRef::key));
    }

    pub fn is_known(&self, key: &DependencyKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_included(&self, key: &DependencyKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.included)
    }

    pub fn is_suppressed(&self, key: &DependencyKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.suppressed)
    }

    fn is_suppressed_by_policy(&self, key: &DependencyKey) -> bool {
        self.suppression
            .as_ref()
            .is_some_and(|predicate| predicate(key))
    }

    pub fn entry(&self, key: &DependencyKey) -> Option<&TreeEntry> {
        self.entries.get(key)
    }

    /// Ancestors of `key` that are not included in this context.
    pub fn missing_ancestors(&self, key: &DependencyKey) -> Vec<DependencyKey> {
        self.entries
            .get(key)
            .map(|entry| {
                entry
                    .ancestors
                    .iter()
                    .filter(|ancestor| !self.is_included(ancestor))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Included keys in the order they were first included.
    pub fn included_keys(&self) -> impl Iterator<Item = &DependencyKey> {
        self.order.iter()
    }

    pub fn included_count(&self) -> usize {
        self.order.len()
    }

    /// Included keys of one package, children before parents.
    ///
    /// Keys reached first through another package are not repeated here.
    pub fn package_post_order(&self, root: &DependencyKey) -> Vec<DependencyKey> {
        let mut ordered = Vec::new();
        let mut visited = BTreeSet::new();
        self.post_order(root, root, &mut visited, &mut ordered);
        ordered
    }

    fn post_order(
        &self,
        key: &DependencyKey,
        root: &DependencyKey,
        visited: &mut BTreeSet<DependencyKey>,
        ordered: &mut Vec<DependencyKey>,
    ) {
        if !visited.insert(key.clone()) {
            return;
        }
        let Some(entry) = self.entries.get(key) else {
            return;
        };
        if !entry.included || entry.package.as_ref() != Some(root) {
            return;
        }
        for child in &entry.children {
            self.post_order(child, root, visited, ordered);
        }
        ordered.push(key.clone());
    }
}

impl fmt::Debug for TreeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeContext")
            .field("entries", &self.entries.len())
            .field("included", &self.order.len())
            .field("has_suppression", &self.suppression.is_some())
            .finish()
    }
}
