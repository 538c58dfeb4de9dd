//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DOCUMENT_TYPE_FOREIGN_ID, DOCUMENT_TYPE_MINOR_ID, DOCUMENT_TYPE_NATIONAL_ID};
use crate::error::DomainError;

/// National document used to identify a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Cédula de Ciudadanía
    #[serde(rename = "CC")]
    NationalId,
    /// Tarjeta de Identidad
    #[serde(rename = "TI")]
    MinorId,
    /// Cédula de Extranjería
    #[serde(rename = "CE")]
    ForeignId,
}

impl DocumentType {
    /// Stored and wire code for this document type
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::NationalId => DOCUMENT_TYPE_NATIONAL_ID,
            DocumentType::MinorId => DOCUMENT_TYPE_MINOR_ID,
            DocumentType::ForeignId => DOCUMENT_TYPE_FOREIGN_ID,
        }
    }
}

impl FromStr for DocumentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DOCUMENT_TYPE_NATIONAL_ID => Ok(DocumentType::NationalId),
            DOCUMENT_TYPE_MINOR_ID => Ok(DocumentType::MinorId),
            DOCUMENT_TYPE_FOREIGN_ID => Ok(DocumentType::ForeignId),
            other => Err(DomainError::UnknownDocumentType(other.to_string())),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Citizen or official registered in the system.
///
/// Carries personal and geographic information only; authentication
/// and authorization are not a concern of this entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_id: String,
    pub city: String,
    /// Region or administrative division
    pub state: String,
    pub address: String,
    /// URL of the profile picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deactivated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Data required to register a user
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_id: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub profile_photo: Option<String>,
}

impl User {
    /// Build a fresh, active user with a new identifier
    pub fn register(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            document_type: new_user.document_type,
            document_id: new_user.document_id,
            city: new_user.city,
            state: new_user.state,
            address: new_user.address,
            profile_photo: new_user.profile_photo,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check if user is active (not deactivated)
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
