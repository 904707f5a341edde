use crate::{CoreError, Result as CoreErrorResult};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

const KEY_SEPARATOR: char = ':';

/// Stable identity of one migratable object, `<type>:<id>`.
///
/// Two dependencies with equal keys are the same logical object no matter
/// how many times they were discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyKey(String);

impl DependencyKey {
    pub fn new(object_type: &str, id: &str) -> Self {
        Self(format!("{object_type}{KEY_SEPARATOR}{id}"))
    }

    /// Parse a key received from a client or read back from storage.
    #[track_caller]
    pub fn parse(value: &str) -> CoreErrorResult<Self> {
        match value.split_once(KEY_SEPARATOR) {
            Some((object_type, id)) if !object_type.is_empty() && !id.is_empty() => {
                Ok(Self(value.to_string()))
            }
            _ => Err(CoreError::InvalidDependencyKey {
                value: value.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    pub fn object_type(&self) -> &str {
        self.0
            .split_once(KEY_SEPARATOR)
            .map(|(object_type, _)| object_type)
            .unwrap_or_default()
    }

    pub fn id(&self) -> &str {
        self.0
            .split_once(KEY_SEPARATOR)
            .map(|(_, id)| id)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
