pub mod archives;
pub mod catalog;
pub mod context;
pub mod descriptors;
pub mod dispatcher;
pub mod id_maps;
pub mod import_log;
pub mod jobs;
pub mod session;
pub mod settings;
