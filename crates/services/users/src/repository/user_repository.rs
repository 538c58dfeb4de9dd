//! User repository built on the generic CRUD repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, QuerySelect};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crud::{scope, CrudResult, Repository, Scope, SeaRepository};
use domain::{DocumentType, User};

use super::entities::user::{self, DocumentKind, Entity as UserEntity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// All lookups exclude deactivated users.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find active user by ID; absent users are a not-found store error
    async fn get_by_id(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<User>;

    /// Find active user by document, `None` when nobody holds it
    async fn get_by_document(
        &self,
        cancel: &CancellationToken,
        document_type: DocumentType,
        document_id: &str,
    ) -> CrudResult<Option<User>>;

    /// Persist a new user
    async fn create(&self, cancel: &CancellationToken, user: User) -> CrudResult<User>;

    /// Soft delete user by ID (sets deleted_at timestamp)
    async fn deactivate(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<()>;
}

/// Concrete implementation of UserRepository with soft delete
pub struct UserStore {
    users: SeaRepository<UserEntity>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaRepository::new(db),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get_by_id(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<User> {
        self.users.get_by_id(cancel, id, &[]).await.map(User::from)
    }

    async fn get_by_document(
        &self,
        cancel: &CancellationToken,
        document_type: DocumentType,
        document_id: &str,
    ) -> CrudResult<Option<User>> {
        let scopes: [Scope<UserEntity>; 3] = [
            scope::filter(user::Column::DocumentType.eq(DocumentKind::from(document_type))),
            scope::filter(user::Column::DocumentId.eq(document_id.to_owned())),
            Scope::new(|select| select.limit(1)),
        ];

        let found = self.users.list(cancel, &scopes).await?;
        Ok(found.into_iter().next().map(User::from))
    }

    async fn create(&self, cancel: &CancellationToken, user: User) -> CrudResult<User> {
        let model = self.users.create(cancel, user::Model::from(user)).await?;
        tracing::debug!(user_id = %model.id, "user stored");
        Ok(User::from(model))
    }

    async fn deactivate(&self, cancel: &CancellationToken, id: Uuid) -> CrudResult<()> {
        self.users.delete(cancel, id).await
    }
}
