use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::modules::auth::{
    interface::AuthError,
    middleware::AuthSession,
    schema::{
        AcceptMessagesQuery, AcceptMessagesResponse, AccountIdResponse, SignInRequest,
        SignInResponse, SignUpRequest, VerifyQuery,
    },
    session::{cleared_session_cookie, session_cookie},
};
use crate::modules::response::ApiResponse;
use crate::AppState;

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<ApiResponse<AccountIdResponse>, AuthError> {
    let Json(req) = payload.map_err(|e| AuthError::Validation(format!("invalid input: {}", e)))?;
    req.validate()
        .map_err(|e| AuthError::Validation(format!("validation failed: {}", e)))?;

    let user_id = state
        .verification
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "user signed up successfully",
        AccountIdResponse { user_id },
    ))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Result<ApiResponse<AccountIdResponse>, AuthError> {
    let username = query
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AuthError::Validation("username is required".into()))?;
    let code = query
        .code
        .as_deref()
        .and_then(|c| c.trim().parse::<u32>().ok())
        .ok_or_else(|| AuthError::Validation("code must be a number".into()))?;

    let user_id = state.verification.consume(&username, code).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "user verified successfully",
        AccountIdResponse { user_id },
    ))
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(req) = payload.map_err(|e| AuthError::Validation(format!("invalid input: {}", e)))?;
    req.validate()
        .map_err(|e| AuthError::Validation(format!("validation failed: {}", e)))?;

    let signed_in = state.sessions.sign_in(&req.identifier, &req.password).await?;

    let cookie = session_cookie(&signed_in.token, state.sessions.session_duration_secs())
        .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::success(
            StatusCode::OK,
            "user signed in successfully",
            SignInResponse {
                token: signed_in.token,
            },
        ),
    ))
}

pub async fn sign_out(Extension(session): Extension<AuthSession>) -> impl IntoResponse {
    tracing::debug!("Account {} signed out", session.account_id);
    (
        [(header::SET_COOKIE, cleared_session_cookie())],
        ApiResponse::empty(StatusCode::OK, "user signed out successfully"),
    )
}

pub async fn set_accepting_messages(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Query(query): Query<AcceptMessagesQuery>,
) -> Result<ApiResponse<AcceptMessagesResponse>, AuthError> {
    let enabled = match query.is_accepting_messages.as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => {
            return Err(AuthError::Validation(
                "is_accepting_messages must be true or false".into(),
            ))
        }
    };

    if !state
        .sessions
        .toggle_accepting_messages(&session.account_id, enabled)
        .await?
    {
        return Err(AuthError::NotUpdated);
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "accept messages status updated",
        AcceptMessagesResponse {
            is_accepting_messages: enabled,
        },
    ))
}

pub async fn get_accepting_messages(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<ApiResponse<AcceptMessagesResponse>, AuthError> {
    let is_accepting_messages = state.sessions.accepting_messages(&session.account_id).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "accept messages status",
        AcceptMessagesResponse {
            is_accepting_messages,
        },
    ))
}
