pub mod authenticated_user;
pub mod authenticator;
pub mod claims;
pub mod error;
pub mod jwt_validator;

pub use authenticated_user::AuthenticatedUser;
pub use authenticator::Authenticator;
pub use claims::Claims;
pub use error::{AuthError, Result};
pub use jwt_validator::JwtValidator;

#[cfg(test)]
mod tests;
