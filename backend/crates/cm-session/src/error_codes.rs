//! Standard error codes for migration error documents.

/// Request document missing a tag, attribute or body
pub const MALFORMED_REQUEST: &str = "MALFORMED_REQUEST";

/// No parser registered for the request tag
pub const UNKNOWN_REQUEST: &str = "UNKNOWN_REQUEST";

/// Archive, descriptor, log, job or object not found
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Session id unknown or already disconnected
pub const SESSION_NOT_FOUND: &str = "SESSION_NOT_FOUND";

/// Credentials rejected
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

/// Advisory lock held by another live session
pub const LOCKED_BY_OTHER: &str = "LOCKED_BY_OTHER";

/// Caller's advisory lock expired or was taken over
pub const LOCK_LOST: &str = "LOCK_LOST";

/// Another import holds the publisher lock
pub const PUBLISHER_LOCK_UNAVAILABLE: &str = "PUBLISHER_LOCK_UNAVAILABLE";

/// Archive format or server build not importable here
pub const COMPATIBILITY_ERROR: &str = "COMPATIBILITY_ERROR";

/// More than one stored identity map for a source server
pub const DUPLICATE_ID_MAP: &str = "DUPLICATE_ID_MAP";

/// Identity mapping with neither target id nor new-object flag
pub const INVALID_MAPPING: &str = "INVALID_MAPPING";

/// Dependency graph references an object that does not exist
pub const RESOLUTION_ERROR: &str = "RESOLUTION_ERROR";

/// Input validation failed
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Handler did not finish in time
pub const TIMEOUT: &str = "TIMEOUT";

/// Internal server error
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
