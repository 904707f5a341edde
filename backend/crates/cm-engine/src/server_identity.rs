use serde::Serialize;

/// Who this server is, as stamped into exported archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIdentity {
    pub server_address: String,
    pub server_version: String,
    pub server_build: String,
    pub repository_id: String,
}
