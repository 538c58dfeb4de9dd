//! Query scopes: composable modifications applied to a select before it runs.

use std::fmt;
use std::sync::Arc;

use sea_orm::{
    sea_query::IntoCondition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

type Modifier<E> = Arc<dyn Fn(Select<E>) -> Select<E> + Send + Sync>;

/// A query modifier for entity `E`.
pub enum Scope<E: EntityTrait> {
    Query(Modifier<E>),
    /// Lift the default exclusion of soft-deleted rows
    WithDeleted,
}

impl<E: EntityTrait> Scope<E> {
    pub fn new<F>(modifier: F) -> Self
    where
        F: Fn(Select<E>) -> Select<E> + Send + Sync + 'static,
    {
        Scope::Query(Arc::new(modifier))
    }
}

impl<E: EntityTrait> Clone for Scope<E> {
    fn clone(&self) -> Self {
        match self {
            Scope::Query(modifier) => Scope::Query(Arc::clone(modifier)),
            Scope::WithDeleted => Scope::WithDeleted,
        }
    }
}

impl<E: EntityTrait> fmt::Debug for Scope<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Query(_) => f.write_str("Scope::Query(..)"),
            Scope::WithDeleted => f.write_str("Scope::WithDeleted"),
        }
    }
}

/// Apply `scopes` in order; reports whether soft-deleted rows were requested.
pub fn apply<E: EntityTrait>(mut select: Select<E>, scopes: &[Scope<E>]) -> (Select<E>, bool) {
    let mut include_deleted = false;
    for scope in scopes {
        match scope {
            Scope::Query(modifier) => select = modifier(select),
            Scope::WithDeleted => include_deleted = true,
        }
    }
    (select, include_deleted)
}

pub fn filter<E, C>(condition: C) -> Scope<E>
where
    E: EntityTrait,
    C: IntoCondition + Clone + Send + Sync + 'static,
{
    Scope::new(move |select| select.filter(condition.clone()))
}

pub fn order_by_asc<E>(column: E::Column) -> Scope<E>
where
    E: EntityTrait,
    E::Column: Send + Sync,
{
    Scope::new(move |select| select.order_by_asc(column))
}

pub fn order_by_desc<E>(column: E::Column) -> Scope<E>
where
    E: EntityTrait,
    E::Column: Send + Sync,
{
    Scope::new(move |select| select.order_by_desc(column))
}

/// Drivers bind OFFSET as a signed 64-bit integer
const MAX_OFFSET: u64 = i64::MAX as u64;

/// 1-based page of `per_page` rows; pages past the end are empty
pub fn paginate<E: EntityTrait>(page: u64, per_page: u64) -> Scope<E> {
    let offset = page
        .saturating_sub(1)
        .saturating_mul(per_page)
        .min(MAX_OFFSET);
    Scope::new(move |select| select.offset(offset).limit(per_page))
}

pub fn with_deleted<E: EntityTrait>() -> Scope<E> {
    Scope::WithDeleted
}
