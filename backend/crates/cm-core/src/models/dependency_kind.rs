use std::panic::Location;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Top-level package root.
    DeployableElement,
    /// Transitive dependency discovered through the object model.
    Object,
    /// Dependency added by hand by the administrator.
    AdHoc,
}

impl DependencyKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DeployableElement => "deployable_element",
            Self::Object => "object",
            Self::AdHoc => "ad_hoc",
        }
    }

    #[track_caller]
    pub fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "deployable_element" => Ok(Self::DeployableElement),
            "object" => Ok(Self::Object),
            "ad_hoc" => Ok(Self::AdHoc),
            _ => Err(crate::CoreError::InvalidDependencyKind {
                value: s.to_string(),
                location: crate::ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
