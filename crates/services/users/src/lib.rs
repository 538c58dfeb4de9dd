//! User domain module.
//!
//! Persists citizens through the generic CRUD layer and exposes the
//! registration use cases on top of it.

pub mod infra;
pub mod repository;
pub mod service;

pub use infra::Migrator;
pub use repository::entities::user;
pub use repository::{UserRepository, UserStore};
pub use service::{Registration, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service::MockUserService;
