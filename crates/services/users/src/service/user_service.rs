//! User service - Handles user registration use cases.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crud::CrudResult;
use domain::{DocumentType, NewUser, User};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outcome of [`UserService::register_if_not_exists`]
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Created(User),
    /// Someone already holds the document; nothing was written
    Existing(User),
}

impl Registration {
    pub fn user(&self) -> &User {
        match self {
            Registration::Created(user) | Registration::Existing(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            Registration::Created(user) | Registration::Existing(user) => user,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create the user unless someone already holds the same document.
    ///
    /// The lookup and the insert are separate calls. Two concurrent
    /// registrations of one document can both miss the lookup; the store's
    /// unique index then rejects the slower insert.
    async fn register_if_not_exists(
        &self,
        cancel: &CancellationToken,
        new_user: NewUser,
    ) -> CrudResult<Registration>;

    async fn get_by_id(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<User>;

    async fn get_by_document(
        &self,
        cancel: &CancellationToken,
        document_type: DocumentType,
        document_id: &str,
    ) -> CrudResult<Option<User>>;

    /// Soft delete; the document stays taken
    async fn deactivate(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register_if_not_exists(
        &self,
        cancel: &CancellationToken,
        new_user: NewUser,
    ) -> CrudResult<Registration> {
        // Lookup failures abort the registration rather than reading as "absent".
        if let Some(existing) = self
            .repo
            .get_by_document(cancel, new_user.document_type, &new_user.document_id)
            .await?
        {
            tracing::debug!(user_id = %existing.id, "document already registered");
            return Ok(Registration::Existing(existing));
        }

        let user = self.repo.create(cancel, User::register(new_user)).await?;
        tracing::info!(user_id = %user.id, document_type = %user.document_type, "user registered");
        Ok(Registration::Created(user))
    }

    async fn get_by_id(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<User> {
        self.repo.get_by_id(cancel, id).await
    }

    async fn get_by_document(
        &self,
        cancel: &CancellationToken,
        document_type: DocumentType,
        document_id: &str,
    ) -> CrudResult<Option<User>> {
        self.repo
            .get_by_document(cancel, document_type, document_id)
            .await
    }

    async fn deactivate(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<()> {
        self.repo.deactivate(cancel, id).await?;
        tracing::info!(user_id = %id, "user deactivated");
        Ok(())
    }
}
