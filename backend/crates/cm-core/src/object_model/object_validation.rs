use serde::{Deserialize, Serialize};

/// What the object model found wrong (or questionable) with one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectValidation {
    pub warnings: Vec<String>,
    pub failures: Vec<String>,
}

impl ObjectValidation {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            warnings: Vec::new(),
            failures: vec![reason.into()],
        }
    }
}
