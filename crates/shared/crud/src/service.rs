//! Generic service: delegates every call to a repository.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::CrudResult;
use crate::repository::Repository;
use crate::resource::Resource;
use crate::scope::Scope;

/// CRUD business operations for a [`Resource`].
#[async_trait]
pub trait CrudService<E: Resource>: Send + Sync {
    async fn create(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<E::Model>;

    async fn get(
        &self,
        cancel: &CancellationToken,
        id: E::Id,
        scopes: &[Scope<E>],
    ) -> CrudResult<E::Model>;

    async fn update(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<()>;

    async fn delete(&self, cancel: &CancellationToken, id: E::Id) -> CrudResult<()>;

    async fn list(&self, cancel: &CancellationToken, scopes: &[Scope<E>])
        -> CrudResult<Vec<E::Model>>;
}

/// Default [`CrudService`] implementation.
pub struct CrudManager<E: Resource> {
    repo: Arc<dyn Repository<E>>,
}

impl<E: Resource> CrudManager<E> {
    pub fn new(repo: Arc<dyn Repository<E>>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<E: Resource> CrudService<E> for CrudManager<E> {
    async fn create(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<E::Model> {
        self.repo.create(cancel, model).await
    }

    async fn get(
        &self,
        cancel: &CancellationToken,
        id: E::Id,
        scopes: &[Scope<E>],
    ) -> CrudResult<E::Model> {
        self.repo.get_by_id(cancel, id, scopes).await
    }

    async fn update(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<()> {
        self.repo.update(cancel, model).await
    }

    async fn delete(&self, cancel: &CancellationToken, id: E::Id) -> CrudResult<()> {
        self.repo.delete(cancel, id).await
    }

    async fn list(
        &self,
        cancel: &CancellationToken,
        scopes: &[Scope<E>],
    ) -> CrudResult<Vec<E::Model>> {
        self.repo.list(cancel, scopes).await
    }
}
