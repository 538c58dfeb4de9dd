//! Use-case layer.

mod user_service;

pub use user_service::{Registration, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
