//! Transport-agnostic endpoints, one per CRUD verb.
//!
//! Each verb has its own typed request. [`Request`] and [`Reply`] tag them so
//! a single [`Endpoints::handle`] entry point can serve every verb.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{CrudError, CrudResult};
use crate::resource::Resource;
use crate::scope::Scope;
use crate::service::CrudService;

pub struct CreateRequest<E: Resource> {
    pub model: E::Model,
}

pub struct GetRequest<E: Resource> {
    pub id: E::Id,
    pub scopes: Vec<Scope<E>>,
}

/// Overwrite the resource at `id` with `model`
pub struct UpdateRequest<E: Resource> {
    pub id: E::Id,
    pub model: E::Model,
}

pub struct DeleteRequest<E: Resource> {
    pub id: E::Id,
}

pub struct ListRequest<E: Resource> {
    pub scopes: Vec<Scope<E>>,
}

impl<E: Resource> GetRequest<E> {
    pub fn new(id: E::Id) -> Self {
        Self { id, scopes: Vec::new() }
    }
}

impl<E: Resource> Default for ListRequest<E> {
    fn default() -> Self {
        Self { scopes: Vec::new() }
    }
}

/// Any CRUD request
pub enum Request<E: Resource> {
    Create(CreateRequest<E>),
    Get(GetRequest<E>),
    Update(UpdateRequest<E>),
    Delete(DeleteRequest<E>),
    List(ListRequest<E>),
}

/// Payload produced by each verb
pub enum Reply<E: Resource> {
    Created(E::Model),
    Fetched(E::Model),
    Updated,
    Deleted,
    Listed(Vec<E::Model>),
}

impl<E: Resource> fmt::Debug for Reply<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Created(model) => f.debug_tuple("Created").field(model).finish(),
            Reply::Fetched(model) => f.debug_tuple("Fetched").field(model).finish(),
            Reply::Updated => f.write_str("Updated"),
            Reply::Deleted => f.write_str("Deleted"),
            Reply::Listed(models) => f.debug_tuple("Listed").field(models).finish(),
        }
    }
}

/// Uniform endpoint response carrying either data or an error.
#[derive(Debug)]
pub struct Response<T> {
    pub result: CrudResult<T>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self { result: Ok(data) }
    }

    pub fn err(&self) -> Option<&CrudError> {
        self.result.as_ref().err()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            result: self.result.map(f),
        }
    }

    pub fn into_result(self) -> CrudResult<T> {
        self.result
    }
}

impl<T> From<CrudResult<T>> for Response<T> {
    fn from(result: CrudResult<T>) -> Self {
        Self { result }
    }
}

/// CRUD endpoints bound to a service.
pub struct Endpoints<E: Resource> {
    service: Arc<dyn CrudService<E>>,
}

impl<E: Resource> Clone for Endpoints<E> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<E: Resource> Endpoints<E> {
    pub fn new(service: Arc<dyn CrudService<E>>) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        cancel: &CancellationToken,
        request: CreateRequest<E>,
    ) -> Response<E::Model> {
        self.service.create(cancel, request.model).await.into()
    }

    pub async fn get(&self, cancel: &CancellationToken, request: GetRequest<E>) -> Response<E::Model> {
        self.service
            .get(cancel, request.id, &request.scopes)
            .await
            .into()
    }

    /// The path identifier wins over whatever the body carried.
    pub async fn update(&self, cancel: &CancellationToken, request: UpdateRequest<E>) -> Response<()> {
        let mut model = request.model;
        E::assign_id(&mut model, request.id);
        self.service.update(cancel, model).await.into()
    }

    pub async fn delete(&self, cancel: &CancellationToken, request: DeleteRequest<E>) -> Response<()> {
        self.service.delete(cancel, request.id).await.into()
    }

    pub async fn list(
        &self,
        cancel: &CancellationToken,
        request: ListRequest<E>,
    ) -> Response<Vec<E::Model>> {
        self.service.list(cancel, &request.scopes).await.into()
    }

    /// Dispatch any request to its verb
    pub async fn handle(&self, cancel: &CancellationToken, request: Request<E>) -> Response<Reply<E>> {
        match request {
            Request::Create(req) => self.create(cancel, req).await.map(Reply::Created),
            Request::Get(req) => self.get(cancel, req).await.map(Reply::Fetched),
            Request::Update(req) => self.update(cancel, req).await.map(|()| Reply::Updated),
            Request::Delete(req) => self.delete(cancel, req).await.map(|()| Reply::Deleted),
            Request::List(req) => self.list(cancel, req).await.map(Reply::Listed),
        }
    }
}
