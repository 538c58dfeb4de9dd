//! Generic repository with soft delete support.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityName, EntityTrait, IntoActiveModel, Iterable, ModelTrait, PrimaryKeyToColumn,
    QueryFilter, Select,
};
use tokio_util::sync::CancellationToken;

use crate::error::{CrudError, CrudResult};
use crate::resource::Resource;
use crate::scope::{self, Scope};

/// CRUD operations over a [`Resource`].
///
/// Every call races the store against `cancel`; a fired token drops the
/// in-flight query and yields [`CrudError::Cancelled`].
#[async_trait]
pub trait Repository<E: Resource>: Send + Sync {
    /// Insert `model`, returning the stored row
    async fn create(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<E::Model>;

    /// Fetch an active row by primary key after applying `scopes`
    async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: E::Id,
        scopes: &[Scope<E>],
    ) -> CrudResult<E::Model>;

    /// Save by primary key: overwrites the row holding the key, inserts when
    /// none does. Other unique keys never select the row to overwrite.
    async fn update(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<()>;

    /// Soft delete by primary key; absent rows are ignored
    async fn delete(&self, cancel: &CancellationToken, id: E::Id) -> CrudResult<()>;

    /// All active rows after applying `scopes`
    async fn list(&self, cancel: &CancellationToken, scopes: &[Scope<E>])
        -> CrudResult<Vec<E::Model>>;
}

/// SeaORM-backed [`Repository`].
pub struct SeaRepository<E> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SeaRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for SeaRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

#[async_trait]
impl<E> Repository<E> for SeaRepository<E>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: Send + Sync,
{
    async fn create(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<E::Model> {
        let active = model.into_active_model().reset_all();
        cancellable(cancel, active.insert(&self.db)).await
    }

    async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        id: E::Id,
        scopes: &[Scope<E>],
    ) -> CrudResult<E::Model> {
        let (select, include_deleted) = scope::apply(E::find_by_id(id.clone()), scopes);
        let select = active_only::<E>(select, include_deleted);

        cancellable(cancel, select.one(&self.db))
            .await?
            .ok_or_else(|| not_found::<E>(&id).into())
    }

    async fn update(&self, cancel: &CancellationToken, model: E::Model) -> CrudResult<()> {
        let key = primary_key_condition::<E>(&model);
        let active = model.into_active_model().reset_all();

        // UpdateMany bypasses ActiveModelBehavior, so run the hook here.
        let mut changes = cancellable(cancel, active.clone().before_save(&self.db, false)).await?;
        for column in fixed_columns::<E>() {
            changes.not_set(column);
        }

        let updated = E::update_many().set(changes).filter(key.clone()).exec(&self.db);
        if cancellable(cancel, updated).await?.rows_affected > 0 {
            return Ok(());
        }

        // MySQL counts changed rows, not matched ones.
        let existing = cancellable(cancel, E::find().filter(key).one(&self.db)).await?;
        if existing.is_none() {
            cancellable(cancel, active.insert(&self.db)).await?;
        }
        Ok(())
    }

    async fn delete(&self, cancel: &CancellationToken, id: E::Id) -> CrudResult<()> {
        let select = active_only::<E>(E::find_by_id(id), false);
        let Some(model) = cancellable(cancel, select.one(&self.db)).await? else {
            return Ok(());
        };

        let mut active = model.into_active_model();
        active.set(E::deleted_at(), Utc::now().into());
        cancellable(cancel, active.update(&self.db)).await?;
        Ok(())
    }

    async fn list(
        &self,
        cancel: &CancellationToken,
        scopes: &[Scope<E>],
    ) -> CrudResult<Vec<E::Model>> {
        let (select, include_deleted) = scope::apply(E::find(), scopes);
        let select = active_only::<E>(select, include_deleted);
        cancellable(cancel, select.all(&self.db)).await
    }
}

async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> CrudResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CrudError::Cancelled),
        result = call => result.map_err(CrudError::from),
    }
}

fn active_only<E: Resource>(select: Select<E>, include_deleted: bool) -> Select<E> {
    if include_deleted {
        select
    } else {
        select.filter(E::deleted_at().is_null())
    }
}

fn not_found<E: Resource>(id: &E::Id) -> DbErr {
    DbErr::RecordNotFound(format!(
        "{} with id {:?}",
        E::default().table_name(),
        id
    ))
}

/// Matches the row holding `model`'s primary key.
fn primary_key_condition<E: Resource>(model: &E::Model) -> Condition {
    E::PrimaryKey::iter()
        .map(|key| key.into_column())
        .fold(Condition::all(), |condition, column| {
            condition.add(column.eq(model.get(column)))
        })
}

/// Columns a save never rewrites: the primary key and `created_at`.
fn fixed_columns<E: Resource>() -> Vec<E::Column> {
    E::PrimaryKey::iter()
        .map(|key| key.into_column())
        .chain(std::iter::once(E::created_at()))
        .collect()
}
