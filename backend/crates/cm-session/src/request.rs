use cm_core::{DbmsMap, ExportDescriptor, IdentityMap, PolicySettings};

/// Every operation a client can ask for, already parsed and checked.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Connect {
        credentials: Option<String>,
        override_lock: bool,
    },
    Disconnect,
    ExtendLock,
    ListDeployableElements {
        object_type: String,
    },
    GetDependencies {
        object_type: String,
        parent_id: String,
    },
    GetExportDescriptor {
        name: String,
    },
    SaveExportDescriptor {
        descriptor: ExportDescriptor,
    },
    ListExportDescriptors,
    ValidateArchive {
        archive_ref: String,
        check_ref: bool,
        warn_on_build_mismatch: Option<bool>,
    },
    GetArchive {
        archive_ref: String,
    },
    ListArchives,
    GetDbmsMap,
    SaveDbmsMap {
        map: DbmsMap,
    },
    GetIdMap {
        source_server: String,
    },
    SaveIdMap {
        map: IdentityMap,
    },
    GetPolicy,
    SavePolicy {
        policy: PolicySettings,
    },
    Export {
        descriptor_name: String,
    },
    Validate {
        archive_ref: String,
    },
    Import {
        archive_ref: String,
    },
    JobStatus {
        job_id: String,
    },
    CancelJob {
        job_id: String,
    },
    ListJobs,
    GetImportLog {
        archive_log_id: String,
    },
}

impl Request {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Disconnect => "disconnect",
            Self::ExtendLock => "extend-lock",
            Self::ListDeployableElements { .. } => "list-deployable-elements",
            Self::GetDependencies { .. } => "get-dependencies",
            Self::GetExportDescriptor { .. } => "get-export-descriptor",
            Self::SaveExportDescriptor { .. } => "save-export-descriptor",
            Self::ListExportDescriptors => "list-export-descriptors",
            Self::ValidateArchive { .. } => "validate-archive",
            Self::GetArchive { .. } => "get-archive",
            Self::ListArchives => "list-archives",
            Self::GetDbmsMap => "get-dbms-map",
            Self::SaveDbmsMap { .. } => "save-dbms-map",
            Self::GetIdMap { .. } => "get-id-map",
            Self::SaveIdMap { .. } => "save-id-map",
            Self::GetPolicy => "get-policy",
            Self::SavePolicy { .. } => "save-policy",
            Self::Export { .. } => "export",
            Self::Validate { .. } => "validate",
            Self::Import { .. } => "import",
            Self::JobStatus { .. } => "job-status",
            Self::CancelJob { .. } => "cancel-job",
            Self::ListJobs => "list-jobs",
            Self::GetImportLog { .. } => "get-import-log",
        }
    }

    /// Whether the caller's advisory lock is refreshed before running.
    pub fn requires_lock(&self) -> bool {
        !matches!(
            self,
            Self::Connect { .. } | Self::Disconnect | Self::ExtendLock
        )
    }
}
