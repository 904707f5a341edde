use crate::{CoreError, DependencyKey, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Translation of one source object id to its id on the target server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityMapping {
    pub object_type: String,
    pub source_id: String,
    pub source_name: String,

    /// Id on the target server, `None` until assigned.
    pub target_id: Option<String>,

    /// The target object does not exist yet and is created at import time.
    pub is_new_object: bool,
}

impl IdentityMapping {
    pub fn existing(
        object_type: impl Into<String>,
        source_id: impl Into<String>,
        source_name: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            source_id: source_id.into(),
            source_name: source_name.into(),
            target_id: Some(target_id.into()),
            is_new_object: false,
        }
    }

    pub fn new_object(
        object_type: impl Into<String>,
        source_id: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            source_id: source_id.into(),
            source_name: source_name.into(),
            target_id: None,
            is_new_object: true,
        }
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(&self.object_type, &self.source_id)
    }

    /// A mapping must either point at a target object or be flagged new.
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.target_id.is_none() && !self.is_new_object {
            return Err(CoreError::InvalidMapping {
                key: self.key().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
