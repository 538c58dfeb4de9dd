//! User registration handlers.

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};

use common::AppError;
use domain::{DocumentType, NewUser, User, VALID_DOCUMENT_TYPES};
use users::user;

use crate::codec::ApiError;
use crate::extractors::{ValidatedJson, ValidatedPath};
use crate::state::AppState;

/// Registration routes, nested under the user resource.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route(
            "/document/:document_type/:document_id",
            get(get_user_by_document),
        )
}

/// Register a user unless the document is already taken.
///
/// 201 with the new user, or 200 with whoever already holds the document.
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<user::Model>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let cancel = state.request_token();
    let registration = state
        .users
        .register_if_not_exists(&cancel, NewUser::from(body))
        .await?;

    let status = if registration.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(registration.into_user())))
}

/// Get the active user holding a document.
pub async fn get_user_by_document(
    State(state): State<AppState>,
    ValidatedPath((document_type, document_id)): ValidatedPath<(String, String)>,
) -> Result<Json<User>, ApiError> {
    let document_type: DocumentType = document_type.parse().map_err(|e| {
        AppError::bad_request(format!(
            "{e}; expected one of {}",
            VALID_DOCUMENT_TYPES.join(", ")
        ))
    })?;

    let cancel = state.request_token();
    state
        .users
        .get_by_document(&cancel, document_type, &document_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::not_found(format!(
                "No user registered with document {document_type} {document_id}"
            ))
            .into()
        })
}
