pub mod app_state;
pub mod documents;
pub mod error;
pub mod error_codes;
pub mod handlers;
pub mod request;
pub mod request_context;
pub mod request_registry;
pub mod session_lock;
pub mod session_registry;

pub use app_state::AppState;
pub use documents::{ErrorDocument, RequestDocument, ResponseDocument};
pub use error::{Result, STATUS_FAILURE, SessionError};
pub use handlers::context::HandlerContext;
pub use handlers::dispatcher::dispatch;
pub use request::Request;
pub use request_context::RequestContext;
pub use request_registry::{RequestParser, RequestRegistry};
pub use session_lock::{LockHolder, LockState, SessionLock};
pub use session_registry::{Session, SessionRegistry};

#[cfg(test)]
mod tests;
