//! Generic CRUD scaffolding over SeaORM.
//!
//! The layers stack as repository → service → endpoints, each generic over a
//! [`Resource`] entity. [`AsyncRepository`] runs repository calls on their own
//! tasks and [`Database`] owns the pooled connection they share.

pub mod async_repository;
pub mod db;
pub mod endpoint;
pub mod error;
pub mod repository;
pub mod resource;
pub mod scope;
pub mod service;

pub use async_repository::{AsyncRepository, Pending};
pub use db::{Database, DbError, Dialect};
pub use endpoint::{
    CreateRequest, DeleteRequest, Endpoints, GetRequest, ListRequest, Reply, Request, Response,
    UpdateRequest,
};
pub use error::{CrudError, CrudResult};
pub use repository::{Repository, SeaRepository};
pub use resource::Resource;
pub use scope::Scope;
pub use service::{CrudManager, CrudService};

pub use tokio_util::sync::CancellationToken;
