use crate::SessionError;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One client request: a tag naming the operation plus its inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDocument {
    pub tag: String,

    /// Absent only for `connect`
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub attributes: HashMap<String, String>,

    #[serde(default)]
    pub body: Option<Value>,
}

impl RequestDocument {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDocument {
    /// `<request tag>-result`
    pub tag: String,
    pub body: Value,
}

impl ResponseDocument {
    pub fn for_tag(tag: &str, body: Value) -> Self {
        Self {
            tag: format!("{tag}-result"),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub args: BTreeMap<String, Value>,
    pub status: u16,
}

impl From<&SessionError> for ErrorDocument {
    fn from(error: &SessionError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            args: error.args(),
            status: error.status(),
        }
    }
}
