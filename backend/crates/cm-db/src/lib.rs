pub mod catalog;
pub mod connection;
pub mod error;
pub mod repositories;

pub use catalog::catalog_object::CatalogObject;
pub use catalog::catalog_object_model::CatalogObjectModel;
pub use connection::{MIGRATOR, connect, run_migrations};
pub use error::{DbError, Result};
pub use repositories::export_descriptor_repository::ExportDescriptorRepository;
pub use repositories::id_map_repository::IdMapRepository;
pub use repositories::import_log_repository::ImportLogRepository;
pub use repositories::settings_repository::SettingsRepository;
pub use repositories::validation_results_repository::ValidationResultsRepository;

#[cfg(test)]
mod tests;
