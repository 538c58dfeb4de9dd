//! User database entity for SeaORM.
//!
//! The model doubles as the JSON body of the generic `/users` routes, so it
//! carries its own validation rules.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::{DocumentType, NewUser, User, DOCUMENT_ID_PATTERN};

static DOCUMENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(DOCUMENT_ID_PATTERN).expect("document id pattern is a valid regex"));

/// Stored document type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum DocumentKind {
    #[sea_orm(string_value = "CC")]
    #[serde(rename = "CC")]
    NationalId,
    #[sea_orm(string_value = "TI")]
    #[serde(rename = "TI")]
    MinorId,
    #[sea_orm(string_value = "CE")]
    #[serde(rename = "CE")]
    ForeignId,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub document_type: DocumentKind,
    #[validate(regex(path = *DOCUMENT_ID, message = "Document number must be 5-15 digits"))]
    pub document_id: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, max = 255, message = "Address must be 1-255 characters"))]
    pub address: String,
    #[validate(url(message = "Profile photo must be a URL"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(skip_deserializing, default = "Utc::now")]
    pub created_at: DateTimeUtc,
    #[serde(skip_deserializing, default = "Utc::now")]
    pub updated_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = active, set = deactivated)
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl crud::Resource for Entity {
    type Id = Uuid;

    fn created_at() -> Column {
        Column::CreatedAt
    }

    fn deleted_at() -> Column {
        Column::DeletedAt
    }

    fn assign_id(model: &mut Model, id: Uuid) {
        model.id = id;
    }
}

impl From<DocumentType> for DocumentKind {
    fn from(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::NationalId => DocumentKind::NationalId,
            DocumentType::MinorId => DocumentKind::MinorId,
            DocumentType::ForeignId => DocumentKind::ForeignId,
        }
    }
}

impl From<DocumentKind> for DocumentType {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::NationalId => DocumentType::NationalId,
            DocumentKind::MinorId => DocumentType::MinorId,
            DocumentKind::ForeignId => DocumentType::ForeignId,
        }
    }
}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            document_type: model.document_type.into(),
            document_id: model.document_id,
            city: model.city,
            state: model.state,
            address: model.address,
            profile_photo: model.profile_photo,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl From<User> for Model {
    fn from(user: User) -> Self {
        Model {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            document_type: user.document_type.into(),
            document_id: user.document_id,
            city: user.city,
            state: user.state,
            address: user.address,
            profile_photo: user.profile_photo,
            created_at: user.created_at,
            updated_at: user.updated_at,
            deleted_at: user.deleted_at,
        }
    }
}

/// Registration data carried by a request body; identity and audit fields
/// are assigned on registration instead.
impl From<Model> for NewUser {
    fn from(model: Model) -> Self {
        NewUser {
            first_name: model.first_name,
            last_name: model.last_name,
            document_type: model.document_type.into(),
            document_id: model.document_id,
            city: model.city,
            state: model.state,
            address: model.address,
            profile_photo: model.profile_photo,
        }
    }
}
