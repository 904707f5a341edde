use serde::{Deserialize, Serialize};

/// Global object creation/overwrite policy applied by imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    /// Create objects that do not exist on the target
    pub create_missing: bool,

    /// Replace objects that already exist on the target
    pub overwrite_existing: bool,

    /// Default for archive validation when the client does not say
    pub warn_on_build_mismatch: bool,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            create_missing: true,
            overwrite_existing: false,
            warn_on_build_mismatch: true,
        }
    }
}
