//! Capability set an entity needs to be managed generically.

use std::fmt::Debug;

use sea_orm::{EntityTrait, PrimaryKeyTrait};
use serde::de::DeserializeOwned;

/// A SeaORM entity with a typed identifier and audit columns.
///
/// Every resource is soft-deletable: rows whose `deleted_at` column is not
/// null are excluded from default reads.
pub trait Resource: EntityTrait {
    /// Identifier as accepted from callers (path segments, requests)
    type Id: Clone
        + Debug
        + Send
        + Sync
        + DeserializeOwned
        + Into<<Self::PrimaryKey as PrimaryKeyTrait>::ValueType>
        + 'static;

    fn created_at() -> Self::Column;

    fn deleted_at() -> Self::Column;

    /// Point `model` at `id`, used when the identifier arrives out of band.
    fn assign_id(model: &mut Self::Model, id: Self::Id);
}
