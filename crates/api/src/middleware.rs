use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use taskforge_auth::AuthError;

use crate::app::{AppState, errors};

/// Bearer-token middleware for all protected routes.
///
/// Decodes the token into a [`taskforge_auth::Principal`] and threads it into
/// the request as an extension, so handlers receive it as an explicit value,
/// never from ambient state. Missing/invalid/expired tokens all answer 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return errors::auth_error_response(AuthError::Unauthorized);
    };

    match state.auth.principal_from_token(token) {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => errors::auth_error_response(e),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}
