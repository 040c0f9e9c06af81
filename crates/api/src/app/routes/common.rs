use axum::http::StatusCode;

use taskforge_auth::{AuthError, Principal, authorize};

use crate::app::{AppState, errors};

/// Enforce the registered requirement for `operation` against the request's
/// principal.
///
/// No registered requirement (operation or group level) means the operation
/// is open to any authenticated principal (the observed fail-open default).
pub fn require(
    state: &AppState,
    principal: &Principal,
    operation: &str,
) -> Result<(), axum::response::Response> {
    match state.registry.requirement_for(operation) {
        None => Ok(()),
        Some(requirement) => {
            if authorize(principal, requirement) {
                Ok(())
            } else {
                Err(errors::json_error(
                    StatusCode::FORBIDDEN,
                    "forbidden",
                    format!("missing permission for '{operation}'"),
                ))
            }
        }
    }
}

/// Run a store-touching service call off the async workers.
///
/// Password hashing is CPU-bound and the Postgres store bridges sync-to-async
/// internally; both want a blocking-friendly thread.
pub async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("blocking task failed: {e}")))?
}
