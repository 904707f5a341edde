mod request_context;
mod session_registry;
