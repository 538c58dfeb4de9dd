//! Gateway constants.

use std::time::Duration;

/// Mount point of the user resource
pub const USERS_PATH: &str = "/users";

// =============================================================================
// Pagination
// =============================================================================

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Message returned in place of store error details
pub const DATABASE_ERROR_MESSAGE: &str = "A database error occurred";

/// Time in-flight requests get to finish after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
