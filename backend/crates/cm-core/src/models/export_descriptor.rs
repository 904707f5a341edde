use crate::{CoreError, DependencyKey, DependencyRef, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Named selection of packages to ship, plus keys to leave out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDescriptor {
    pub name: String,
    pub packages: Vec<DependencyRef>,
    #[serde(default)]
    pub exclusions: Vec<DependencyKey>,
}

impl ExportDescriptor {
    pub fn new(name: impl Into<String>, packages: Vec<DependencyRef>) -> Self {
        Self {
            name: name.into(),
            packages,
            exclusions: Vec::new(),
        }
    }

    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "Export descriptor name cannot be empty".to_string(),
                field: Some("name".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.packages.is_empty() {
            return Err(CoreError::Validation {
                message: format!("Export descriptor '{}' names no packages", self.name),
                field: Some("packages".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
