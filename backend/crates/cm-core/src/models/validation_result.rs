use crate::{DependencyKey, ValidationStatus};

use serde::{Deserialize, Serialize};

/// Outcome of validating one dependency against the target server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub key: DependencyKey,
    pub status: ValidationStatus,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub failures: Vec<String>,

    /// Ancestors not shipped in the archive; installation expects them on the target
    #[serde(default)]
    pub absent_ancestors: Vec<DependencyKey>,
}

impl ValidationResult {
    pub fn pass(key: DependencyKey) -> Self {
        Self {
            key,
            status: ValidationStatus::Pass,
            warnings: Vec::new(),
            failures: Vec::new(),
            absent_ancestors: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
        self.refresh_status();
    }

    pub fn add_failure(&mut self, failure: impl Into<String>) {
        self.failures.push(failure.into());
        self.refresh_status();
    }

    pub fn add_absent_ancestor(&mut self, ancestor: DependencyKey, on_target: bool) {
        let warning = if on_target {
            format!("Ancestor {ancestor} exists on target but is not in the archive")
        } else {
            format!("Ancestor {ancestor} is neither in the archive nor on the target")
        };
        self.warnings.push(warning);
        self.absent_ancestors.push(ancestor);
        self.refresh_status();
    }

    pub fn is_failed(&self) -> bool {
        self.status == ValidationStatus::Failed
    }

    fn refresh_status(&mut self) {
        self.status = if !self.failures.is_empty() {
            ValidationStatus::Failed
        } else if !self.warnings.is_empty() {
            ValidationStatus::Warnings
        } else {
            ValidationStatus::Pass
        };
    }
}
