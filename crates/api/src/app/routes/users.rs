//! User management endpoints.
//!
//! Every handler looks up its operation in the requirement registry before
//! touching the service; responses only ever carry hash-stripped views.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use taskforge_auth::{NewUser, Principal, UpdateUser};
use taskforge_core::UserId;

use crate::app::routes::common::{require, run_blocking};
use crate::app::{AppState, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

/// GET /users
pub async fn list_users(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "users.list") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.list_users()).await {
        Ok(users) => Json(serde_json::json!({ "users": users })).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// POST /users
pub async fn create_user(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "users.create") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.create_user(body)).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// GET /users/:id
pub async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "users.get") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.get_user(UserId::from_uuid(id))).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// PATCH /users/:id
pub async fn update_user(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "users.update") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.update_user(UserId::from_uuid(id), body)).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// DELETE /users/:id
pub async fn delete_user(
    Extension(state): Extension<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    if let Err(resp) = require(&state, &principal, "users.delete") {
        return resp;
    }

    let auth = state.auth.clone();
    match run_blocking(move || auth.remove_user(UserId::from_uuid(id))).await {
        Ok(()) => Json(serde_json::json!({
            "message": format!("user {id} removed"),
        }))
        .into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}
