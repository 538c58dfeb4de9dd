//! HTTP codec for the generic CRUD endpoints.
//!
//! Decoding turns request bodies into endpoint requests; encoding turns
//! endpoint responses into status codes and JSON bodies. Error bodies are
//! always `{"error": "<message>"}` with the status taken from the error chain.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use common::{code_of, AppError, ErrorBody};
use crud::{scope, CrudError, ListRequest, Resource, Response as EndpointResponse};

use crate::config::DATABASE_ERROR_MESSAGE;
use crate::extractors::validated_json::invalid_body;
use crate::types::PaginationParams;

/// Error leaving a handler.
#[derive(Debug)]
pub struct ApiError(pub CrudError);

impl From<CrudError> for ApiError {
    fn from(err: CrudError) -> Self {
        ApiError(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(CrudError::App(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = code_of(&self.0);
        let message = match &self.0 {
            // Store details stay in the log
            CrudError::Database(err) => {
                tracing::error!(code = code.as_u16(), error = %err, "database error");
                DATABASE_ERROR_MESSAGE.to_string()
            }
            err => {
                if code.is_server_error() {
                    tracing::error!(code = code.as_u16(), error = %err, "request failed");
                }
                err.to_string()
            }
        };
        (code, Json(ErrorBody { error: message })).into_response()
    }
}

/// Encode a response carrying data with the given success status.
pub fn encode<T: Serialize>(response: EndpointResponse<T>, success: StatusCode) -> Response {
    match response.into_result() {
        Ok(data) => (success, Json(data)).into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

/// Encode a response without data; success is `204 No Content`.
pub fn encode_empty(response: EndpointResponse<()>) -> Response {
    match response.into_result() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

/// Decode a list body.
///
/// An empty body lists everything. Otherwise the body is a
/// [`PaginationParams`] object selecting one page.
pub fn decode_list<E: Resource>(body: &[u8]) -> Result<ListRequest<E>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ListRequest::default());
    }

    let params: PaginationParams = serde_json::from_slice(body).map_err(invalid_body)?;
    Ok(ListRequest {
        scopes: vec![scope::paginate(params.page(), params.limit())],
    })
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use sea_orm::DbErr;
    use serde_json::Value;

    use super::*;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_uses_given_status() {
        let response = encode(EndpointResponse::ok(vec![1, 2]), StatusCode::CREATED);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_of(response).await, serde_json::json!([1, 2]));

        let response = encode_empty(EndpointResponse::ok(()));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn app_error_keeps_code_and_message() {
        let failed = Err::<(), _>(CrudError::App(AppError::conflict("already registered")));
        let response = encode(EndpointResponse::from(failed), StatusCode::OK);
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_of(response).await["error"], "already registered");
    }

    #[tokio::test]
    async fn database_error_is_masked() {
        let err = CrudError::Database(DbErr::Custom("connection refused on 10.0.0.3".into()));
        let response = ApiError(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["error"], DATABASE_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn cancellation_is_a_server_error() {
        let response = ApiError(CrudError::Cancelled).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["error"], CrudError::Cancelled.to_string());
    }
}
