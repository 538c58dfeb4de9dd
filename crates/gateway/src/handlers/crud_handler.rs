//! Generic handlers behind the CRUD routes of any [`Resource`].

use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crud::{CreateRequest, DeleteRequest, Endpoints, GetRequest, Resource, UpdateRequest};

use crate::codec::{self, ApiError};
use crate::extractors::{ValidatedJson, ValidatedPath};

/// Router state for one resource's CRUD routes.
pub struct CrudState<E: Resource> {
    pub endpoints: Endpoints<E>,
    pub shutdown: CancellationToken,
}

impl<E: Resource> CrudState<E> {
    pub fn new(endpoints: Endpoints<E>, shutdown: CancellationToken) -> Self {
        Self {
            endpoints,
            shutdown,
        }
    }

    fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

impl<E: Resource> Clone for CrudState<E> {
    fn clone(&self) -> Self {
        Self {
            endpoints: self.endpoints.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// `POST {path}` → 201 with the stored model
pub async fn create<E>(
    State(state): State<CrudState<E>>,
    ValidatedJson(model): ValidatedJson<E::Model>,
) -> Response
where
    E: Resource,
    E::Model: Serialize + DeserializeOwned + Validate,
{
    let cancel = state.request_token();
    let response = state.endpoints.create(&cancel, CreateRequest { model }).await;
    codec::encode(response, StatusCode::CREATED)
}

/// `GET {path}/:id` → 200 with the active model
pub async fn get<E>(
    State(state): State<CrudState<E>>,
    ValidatedPath(id): ValidatedPath<E::Id>,
) -> Response
where
    E: Resource,
    E::Model: Serialize,
{
    let cancel = state.request_token();
    let response = state.endpoints.get(&cancel, GetRequest::new(id)).await;
    codec::encode(response, StatusCode::OK)
}

/// `PUT {path}/:id` → 204; the path id wins over any id in the body
pub async fn update<E>(
    State(state): State<CrudState<E>>,
    ValidatedPath(id): ValidatedPath<E::Id>,
    ValidatedJson(model): ValidatedJson<E::Model>,
) -> Response
where
    E: Resource,
    E::Model: DeserializeOwned + Validate,
{
    let cancel = state.request_token();
    let response = state.endpoints.update(&cancel, UpdateRequest { id, model }).await;
    codec::encode_empty(response)
}

/// `DELETE {path}/:id` → 204, also when nothing was active
pub async fn delete<E: Resource>(
    State(state): State<CrudState<E>>,
    ValidatedPath(id): ValidatedPath<E::Id>,
) -> Response {
    let cancel = state.request_token();
    let response = state.endpoints.delete(&cancel, DeleteRequest { id }).await;
    codec::encode_empty(response)
}

/// `POST {path}/list` → 200 with the active models, optionally one page
pub async fn list<E>(
    State(state): State<CrudState<E>>,
    body: Bytes,
) -> Result<Response, ApiError>
where
    E: Resource,
    E::Model: Serialize,
{
    let request = codec::decode_list::<E>(&body)?;
    let cancel = state.request_token();
    let response = state.endpoints.list(&cancel, request).await;
    Ok(codec::encode(response, StatusCode::OK))
}
