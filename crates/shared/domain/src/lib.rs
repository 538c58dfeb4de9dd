//! Domain layer - Core citizen-registry entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Persistence and transport crates convert to and from these types.

pub mod constants;
pub mod error;
pub mod user;

pub use constants::*;
pub use error::DomainError;
pub use user::{DocumentType, NewUser, User};
