pub mod authenticator;
pub mod error;
pub mod health;
pub mod logger;
pub mod migration;
pub mod routes;


pub use crate::authenticator::build_authenticator;
pub use crate::error::{Result, ServerError};
pub use crate::routes::build_router;
