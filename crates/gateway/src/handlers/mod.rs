//! HTTP request handlers.

pub mod crud_handler;
pub mod health_handler;
pub mod user_handler;

pub use crud_handler::CrudState;
pub use health_handler::health_routes;
pub use user_handler::user_routes;
