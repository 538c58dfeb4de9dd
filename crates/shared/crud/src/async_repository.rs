//! Task-backed wrapper around a [`Repository`].
//!
//! Each call is spawned onto its own tokio task and hands back a [`Pending`]
//! handle that resolves exactly once. Dropping the handle detaches the task;
//! it still runs to completion and its result is discarded. Concurrent calls
//! complete in no particular order.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{CrudError, CrudResult};
use crate::repository::Repository;
use crate::resource::Resource;
use crate::scope::Scope;

/// Outcome of a spawned repository call.
#[must_use = "a pending result does nothing unless awaited"]
pub struct Pending<T> {
    handle: JoinHandle<CrudResult<T>>,
}

impl<T> Pending<T> {
    fn spawn<F>(call: F) -> Self
    where
        F: Future<Output = CrudResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        Self {
            handle: tokio::spawn(call),
        }
    }
}

impl<T> Future for Pending<T> {
    type Output = CrudResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) => Poll::Ready(Err(CrudError::Task(err.to_string()))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Asynchronous facade over a shared repository.
pub struct AsyncRepository<E: Resource> {
    repo: Arc<dyn Repository<E>>,
}

impl<E: Resource> Clone for AsyncRepository<E> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<E: Resource> AsyncRepository<E> {
    pub fn new(repo: Arc<dyn Repository<E>>) -> Self {
        Self { repo }
    }

    pub fn create(&self, cancel: &CancellationToken, model: E::Model) -> Pending<E::Model> {
        let repo = Arc::clone(&self.repo);
        let cancel = cancel.clone();
        Pending::spawn(async move { repo.create(&cancel, model).await })
    }

    pub fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: E::Id,
        scopes: Vec<Scope<E>>,
    ) -> Pending<E::Model> {
        let repo = Arc::clone(&self.repo);
        let cancel = cancel.clone();
        Pending::spawn(async move { repo.get_by_id(&cancel, id, &scopes).await })
    }

    pub fn update(&self, cancel: &CancellationToken, model: E::Model) -> Pending<()> {
        let repo = Arc::clone(&self.repo);
        let cancel = cancel.clone();
        Pending::spawn(async move { repo.update(&cancel, model).await })
    }

    pub fn delete(&self, cancel: &CancellationToken, id: E::Id) -> Pending<()> {
        let repo = Arc::clone(&self.repo);
        let cancel = cancel.clone();
        Pending::spawn(async move { repo.delete(&cancel, id).await })
    }

    pub fn list(&self, cancel: &CancellationToken, scopes: Vec<Scope<E>>) -> Pending<Vec<E::Model>> {
        let repo = Arc::clone(&self.repo);
        let cancel = cancel.clone();
        Pending::spawn(async move { repo.list(&cancel, &scopes).await })
    }
}
