//! Route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crud::{CrudManager, Endpoints, Resource, SeaRepository};
use users::user;

use crate::config::USERS_PATH;
use crate::handlers::{crud_handler, health_routes, user_routes, CrudState};
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let repo = Arc::new(SeaRepository::<user::Entity>::new(state.db.get_connection()));
    let users = Endpoints::<user::Entity>::new(Arc::new(CrudManager::<user::Entity>::new(repo)));

    let router = Router::new()
        .nest("/health", health_routes())
        .nest(USERS_PATH, user_routes());

    register_crud_routes(router, USERS_PATH, users, state.shutdown.clone()).with_state(state)
}

/// Mount the five CRUD routes of a resource under `path`.
///
/// | Method | Path            | Success |
/// |--------|-----------------|---------|
/// | POST   | `{path}`        | 201     |
/// | GET    | `{path}/:id`    | 200     |
/// | PUT    | `{path}/:id`    | 204     |
/// | DELETE | `{path}/:id`    | 204     |
/// | POST   | `{path}/list`   | 200     |
pub fn register_crud_routes<E, S>(
    router: Router<S>,
    path: &str,
    endpoints: Endpoints<E>,
    shutdown: CancellationToken,
) -> Router<S>
where
    E: Resource,
    E::Model: Serialize + DeserializeOwned + Validate,
    S: Clone + Send + Sync + 'static,
{
    let item = format!("{path}/:id");
    let list = format!("{path}/list");

    let crud: Router<S> = Router::new()
        .route(path, post(crud_handler::create::<E>))
        .route(
            &item,
            get(crud_handler::get::<E>)
                .put(crud_handler::update::<E>)
                .delete(crud_handler::delete::<E>),
        )
        .route(&list, post(crud_handler::list::<E>))
        .with_state(CrudState::new(endpoints, shutdown));

    router.merge(crud)
}
