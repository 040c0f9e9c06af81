//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder layout:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::post};

use taskforge_auth::{
    AuthConfig, AuthService, CredentialStore, Requirement, RequirementRegistry,
};
use taskforge_store::{InMemoryCredentialStore, seed_roles, seed_users};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared per-request state: the auth service plus the static requirement
/// registry the routing shim consults before each protected handler.
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub registry: RequirementRegistry,
}

/// Requirements for every guarded operation, declared once at startup.
///
/// `auth.profile` has no entry: any authenticated principal may read its own
/// identity.
fn default_registry() -> RequirementRegistry {
    let mut registry = RequirementRegistry::new();

    registry.set_group_default("users", Requirement::single("users", "read"));
    registry.set_operation("users.create", Requirement::single("users", "create"));
    registry.set_operation("users.update", Requirement::single("users", "update"));
    registry.set_operation("users.delete", Requirement::single("users", "delete"));

    registry.set_group_default("roles", Requirement::single("roles", "read"));
    registry.set_operation("roles.create", Requirement::single("roles", "create"));
    registry.set_operation("roles.update", Requirement::single("roles", "update"));

    registry
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AuthConfig) -> Router {
    let store = bootstrap_store().await;
    build_app_with_store(store, config).await
}

/// Build the router on an explicit store (tests inject their own).
pub async fn build_app_with_store(
    store: Arc<dyn CredentialStore>,
    config: AuthConfig,
) -> Router {
    // Seeding hashes passwords; keep that off the async workers.
    {
        let store = store.clone();
        tokio::task::spawn_blocking(move || {
            seed_roles(store.as_ref())?;
            seed_users(store.as_ref())
        })
        .await
        .expect("seed task panicked")
        .expect("failed to seed roles/users");
    }

    let state = Arc::new(AppState {
        auth: Arc::new(AuthService::new(store, config)),
        registry: default_registry(),
    });

    // Protected routes: bearer token required; the decoded principal rides
    // along as a request extension.
    let protected = routes::router()
        .layer(Extension(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", axum::routing::get(routes::system::health))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .layer(Extension(state))
        .merge(protected)
}

#[cfg(not(feature = "postgres"))]
async fn bootstrap_store() -> Arc<dyn CredentialStore> {
    Arc::new(InMemoryCredentialStore::new())
}

#[cfg(feature = "postgres")]
async fn bootstrap_store() -> Arc<dyn CredentialStore> {
    match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("failed to connect to Postgres");
            let store = taskforge_store::PostgresCredentialStore::new(pool);
            store
                .ensure_schema()
                .await
                .expect("failed to initialize schema");
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; falling back to in-memory store");
            Arc::new(InMemoryCredentialStore::new())
        }
    }
}
