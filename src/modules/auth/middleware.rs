use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::interface::AuthError;
use super::session::SESSION_COOKIE_NAME;
use crate::services::jwt::SessionError;
use crate::AppState;

/// Identity resolved from a valid session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account_id: String,
}

/// Gate for protected routes. Invalid and expired tokens are both answered
/// with 401; the account itself is not looked up.
///
/// The `token` cookie is tried first. When it does not validate, a bearer
/// token in `Authorization` still gets its chance.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let account_id = session_tokens(req.headers())
        .iter()
        .find_map(|token| match state.jwt_service.validate(token) {
            Ok(account_id) => Some(account_id),
            Err(SessionError::Expired) => {
                tracing::debug!("Rejected expired session token");
                None
            }
            Err(other) => {
                tracing::debug!("Rejected session token: {}", other);
                None
            }
        })
        .ok_or(AuthError::Unauthorized)?;

    req.extensions_mut().insert(AuthSession { account_id });
    Ok(next.run(req).await)
}

/// Session tokens in the order they are tried: the `token` cookie, then an
/// `Authorization: Bearer` header.
fn session_tokens(headers: &HeaderMap) -> Vec<String> {
    extract_cookie_token(headers)
        .into_iter()
        .chain(extract_bearer_token(headers))
        .collect()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| key.trim() == SESSION_COOKIE_NAME && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
