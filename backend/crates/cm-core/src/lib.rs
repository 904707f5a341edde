pub mod error;
pub mod models;
pub mod object_model;
pub mod tree_context;
pub mod validation_context;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use models::archive_detail::ArchiveDetail;
pub use models::archive_info::{ARCHIVE_FORMAT_VERSION, ArchiveInfo};
pub use models::archive_summary::{ArchivePackageSummary, ArchiveSummary};
pub use models::dbms_map::DbmsMap;
pub use models::dependency::Dependency;
pub use models::dependency_key::DependencyKey;
pub use models::dependency_kind::DependencyKind;
pub use models::dependency_ref::DependencyRef;
pub use models::export_descriptor::ExportDescriptor;
pub use models::identity_map::IdentityMap;
pub use models::identity_mapping::IdentityMapping;
pub use models::import_descriptor::ImportDescriptor;
pub use models::import_log_entry::ImportLogEntry;
pub use models::import_log_status::ImportLogStatus;
pub use models::import_package::ImportPackage;
pub use models::policy_settings::PolicySettings;
pub use models::transaction_log_entry::TransactionLogEntry;
pub use models::transaction_status::TransactionStatus;
pub use models::validation_result::ValidationResult;
pub use models::validation_results::ValidationResults;
pub use models::validation_status::ValidationStatus;
pub use object_model::error::{ObjectModelError, Result as ObjectModelResult};
pub use object_model::install_outcome::{InstallAction, InstallOutcome};
pub use object_model::object_validation::ObjectValidation;
pub use object_model::ObjectModel;
pub use tree_context::{Inclusion, SuppressionPredicate, TreeContext, TreeEntry};
pub use validation_context::ValidationContext;

#[cfg(test)]
mod tests;
