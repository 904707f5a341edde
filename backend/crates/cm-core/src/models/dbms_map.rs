use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source data-source name to target data-source name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbmsMap {
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl DbmsMap {
    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.mappings.get(source).map(String::as_str)
    }
}
