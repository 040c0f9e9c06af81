use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use taskforge_auth::AuthError;

/// Map a core auth error onto its HTTP status.
///
/// `InvalidCredentials` and `Unauthorized` both answer 401 (the former on the
/// login path, the latter on token checks); `Forbidden` is the distinct 403
/// for a valid token without the required permission. Backend details stay in
/// the logs, never in the payload.
pub fn auth_error_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid credentials")
        }
        AuthError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized"),
        AuthError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        AuthError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        AuthError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        AuthError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AuthError::Storage(msg) => {
            tracing::error!("storage failure: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "storage failure")
        }
        AuthError::Internal(msg) => {
            tracing::error!("internal failure: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal failure")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
