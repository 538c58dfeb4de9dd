//! Request and response types.

pub mod pagination;

pub use pagination::PaginationParams;
