use crate::{DependencyKey, ValidationResults};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPackage {
    pub root: DependencyKey,
    pub name: String,

    /// Results from a prior validation run, if any
    #[serde(default)]
    pub results: Option<ValidationResults>,
}
