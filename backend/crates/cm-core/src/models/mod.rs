pub mod archive_detail;
pub mod archive_info;
pub mod archive_summary;
pub mod dbms_map;
pub mod dependency;
pub mod dependency_key;
pub mod dependency_kind;
pub mod dependency_ref;
pub mod export_descriptor;
pub mod identity_map;
pub mod identity_mapping;
pub mod import_descriptor;
pub mod import_log_entry;
pub mod import_log_status;
pub mod import_package;
pub mod policy_settings;
pub mod transaction_log_entry;
pub mod transaction_status;
pub mod validation_result;
pub mod validation_results;
pub mod validation_status;
