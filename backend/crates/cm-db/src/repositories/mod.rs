pub mod export_descriptor_repository;
pub mod id_map_repository;
pub mod import_log_repository;
pub mod settings_repository;
pub mod validation_results_repository;
