pub mod catalog_object;
pub mod catalog_object_model;
