#![allow(dead_code)]

pub mod fake_model;
pub mod fixtures;

pub use fake_model::*;
pub use fixtures::*;
