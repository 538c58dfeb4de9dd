//! Transport-facing error handling.
//!
//! [`AppError`] carries an HTTP-style status code, a human message and an
//! optional underlying cause. [`code_of`] recovers the status from any error
//! chain, so intermediate wrappers do not lose it.

use std::error::Error as StdError;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::{Deserialize, Serialize};

/// Boxed error used as the optional cause of an [`AppError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Application error with an intended status code.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
    source: Option<BoxError>,
}

/// Error response body for HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn new(code: StatusCode, message: impl Into<String>, source: Option<BoxError>) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// 400 without an underlying cause
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, None)
    }

    /// 404 without an underlying cause
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, None)
    }

    /// 409 without an underlying cause
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message, None)
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

/// Status code carried by the first [`AppError`] in the chain, else 500.
pub fn code_of(err: &(dyn StdError + 'static)) -> StatusCode {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(app) = e.downcast_ref::<AppError>() {
            return app.code;
        }
        current = e.source();
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.code.is_server_error() {
            tracing::error!(code = self.code.as_u16(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.code, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        AppError::new(StatusCode::BAD_REQUEST, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("registration failed")]
    struct Wrapper(#[source] AppError);

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] Wrapper);

    #[test]
    fn bad_request_reports_400_and_bare_message() {
        let err = AppError::bad_request("invalid payload");
        assert_eq!(code_of(&err), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid payload");
    }

    #[test]
    fn new_with_cause_appends_cause_to_message() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "unique constraint failed");
        let err = AppError::new(
            StatusCode::CONFLICT,
            "duplicate document",
            Some(Box::new(cause)),
        );

        assert_eq!(err.to_string(), "duplicate document: unique constraint failed");
        assert_eq!(code_of(&err), StatusCode::CONFLICT);
        assert!(err.source().is_some());
    }

    #[test]
    fn constructors_carry_their_codes() {
        assert_eq!(AppError::not_found("x").code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::new(StatusCode::IM_A_TEAPOT, "x", None).code(),
            StatusCode::IM_A_TEAPOT
        );
    }

    #[test]
    fn code_of_walks_wrapped_chain() {
        let err = Outer(Wrapper(AppError::conflict("duplicate document")));
        assert_eq!(code_of(&err), StatusCode::CONFLICT);
    }

    #[test]
    fn code_of_defaults_to_500_for_foreign_errors() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(code_of(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_become_bad_requests() {
        let err: AppError = DomainError::UnknownDocumentType("XX".to_string()).into();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Unknown document type: XX");
    }

    #[tokio::test]
    async fn into_response_writes_status_and_error_body() {
        let response = AppError::not_found("user not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "user not found");
    }
}
