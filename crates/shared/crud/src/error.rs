//! Errors returned by every CRUD layer.

use common::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// CRUD operation error.
///
/// Store errors are carried unchanged; the transport decides their status.
#[derive(Debug, Error)]
pub enum CrudError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Database(#[from] DbErr),

    #[error("operation cancelled")]
    Cancelled,

    #[error("task failed: {0}")]
    Task(String),
}

impl CrudError {
    /// Classified SQL error, when the store reported one
    pub fn sql_err(&self) -> Option<SqlErr> {
        match self {
            CrudError::Database(err) => err.sql_err(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CrudError::Database(DbErr::RecordNotFound(_)))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}

pub type CrudResult<T> = Result<T, CrudError>;
