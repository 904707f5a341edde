//! Tag to parser table, built once at startup.
//!
//! Parsing is the only place request inputs are checked; a missing or
//! invalid attribute is reported before any handler runs.

use crate::{Request, RequestDocument, Result as SessionErrorResult, SessionError};

use cm_core::ErrorLocation;

use std::collections::HashMap;
use std::panic::Location;

use serde::de::DeserializeOwned;

pub type RequestParser = fn(&RequestDocument) -> SessionErrorResult<Request>;

pub struct RequestRegistry {
    parsers: HashMap<&'static str, RequestParser>,
}

impl RequestRegistry {
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Registry with a parser for every supported operation.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("connect", parse_connect);
        registry.register("disconnect", |_| Ok(Request::Disconnect));
        registry.register("extend-lock", |_| Ok(Request::ExtendLock));
        registry.register("list-deployable-elements", |doc| {
            Ok(Request::ListDeployableElements {
                object_type: required(doc, "type")?,
            })
        });
        registry.register("get-dependencies", |doc| {
            Ok(Request::GetDependencies {
                object_type: required(doc, "type")?,
                parent_id: required(doc, "parentId")?,
            })
        });
        registry.register("get-export-descriptor", |doc| {
            Ok(Request::GetExportDescriptor {
                name: required(doc, "descName")?,
            })
        });
        registry.register("save-export-descriptor", |doc| {
            Ok(Request::SaveExportDescriptor {
                descriptor: body(doc)?,
            })
        });
        registry.register("list-export-descriptors", |_| {
            Ok(Request::ListExportDescriptors)
        });
        registry.register("validate-archive", |doc| {
            Ok(Request::ValidateArchive {
                archive_ref: required(doc, "archiveRef")?,
                check_ref: optional_bool(doc, "checkRef")?.unwrap_or(false),
                warn_on_build_mismatch: optional_bool(doc, "warnOnBuildMismatch")?,
            })
        });
        registry.register("get-archive", |doc| {
            Ok(Request::GetArchive {
                archive_ref: required(doc, "archiveRef")?,
            })
        });
        registry.register("list-archives", |_| Ok(Request::ListArchives));
        registry.register("get-dbms-map", |_| Ok(Request::GetDbmsMap));
        registry.register("save-dbms-map", |doc| Ok(Request::SaveDbmsMap { map: body(doc)? }));
        registry.register("get-id-map", |doc| {
            Ok(Request::GetIdMap {
                source_server: required(doc, "sourceServer")?,
            })
        });
        registry.register("save-id-map", |doc| Ok(Request::SaveIdMap { map: body(doc)? }));
        registry.register("get-policy", |_| Ok(Request::GetPolicy));
        registry.register("save-policy", |doc| {
            Ok(Request::SavePolicy { policy: body(doc)? })
        });
        registry.register("export", |doc| {
            Ok(Request::Export {
                descriptor_name: required(doc, "descName")?,
            })
        });
        registry.register("validate", |doc| {
            Ok(Request::Validate {
                archive_ref: required(doc, "archiveRef")?,
            })
        });
        registry.register("import", |doc| {
            Ok(Request::Import {
                archive_ref: required(doc, "archiveRef")?,
            })
        });
        registry.register("job-status", |doc| {
            Ok(Request::JobStatus {
                job_id: required(doc, "jobId")?,
            })
        });
        registry.register("cancel-job", |doc| {
            Ok(Request::CancelJob {
                job_id: required(doc, "jobId")?,
            })
        });
        registry.register("list-jobs", |_| Ok(Request::ListJobs));
        registry.register("get-import-log", |doc| {
            Ok(Request::GetImportLog {
                archive_log_id: required(doc, "archiveLogId")?,
            })
        });
        registry
    }

    pub fn register(&mut self, tag: &'static str, parser: RequestParser) {
        self.parsers.insert(tag, parser);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.parsers.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.parsers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    #[track_caller]
    pub fn parse(&self, doc: &RequestDocument) -> SessionErrorResult<Request> {
        if doc.tag.trim().is_empty() {
            return Err(SessionError::malformed("Request has no tag", Some("tag")));
        }

        let parser = self
            .parsers
            .get(doc.tag.as_str())
            .ok_or_else(|| SessionError::UnknownRequest {
                tag: doc.tag.clone(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        parser(doc)
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_connect(doc: &RequestDocument) -> SessionErrorResult<Request> {
    Ok(Request::Connect {
        credentials: doc.attributes.get("credentials").cloned(),
        override_lock: optional_bool(doc, "overrideLock")?.unwrap_or(false),
    })
}

fn required(doc: &RequestDocument, name: &str) -> SessionErrorResult<String> {
    match doc.attributes.get(name).map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(SessionError::malformed(
            format!("Missing attribute '{name}' for {}", doc.tag),
            Some(name),
        )),
    }
}

fn optional_bool(doc: &RequestDocument, name: &str) -> SessionErrorResult<Option<bool>> {
    match doc.attributes.get(name).map(|value| value.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<bool>().map(Some).map_err(|_| {
            SessionError::malformed(
                format!("Attribute '{name}' must be true or false, got '{value}'"),
                Some(name),
            )
        }),
    }
}

fn body<T: DeserializeOwned>(doc: &RequestDocument) -> SessionErrorResult<T> {
    let value = doc
        .body
        .clone()
        .ok_or_else(|| SessionError::malformed(format!("{} requires a body", doc.tag), Some("body")))?;

    serde_json::from_value(value).map_err(|e| {
        SessionError::malformed(format!("Invalid body for {}: {e}", doc.tag), Some("body"))
    })
}
