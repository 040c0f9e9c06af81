use axum::{Router, routing::get};

pub mod auth;
pub mod common;
pub mod roles;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/profile", get(auth::profile))
        .nest("/users", users::router())
        .nest("/roles", roles::router())
}
