use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use super::interface::MessageError;
use super::schema::{MessageResponse, MessagesResponse, SendMessageRequest};
use crate::modules::auth::middleware::AuthSession;
use crate::modules::response::ApiResponse;
use crate::AppState;

// =============================================================================
// POST /send-message - anonymous
// =============================================================================

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<ApiResponse<MessageResponse>, MessageError> {
    let Json(req) =
        payload.map_err(|e| MessageError::Validation(format!("invalid input: {}", e)))?;
    req.validate()
        .map_err(|e| MessageError::Validation(format!("validation failed: {}", e)))?;

    let message = state.messages.send(&req.identifier, &req.content).await?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "message sent successfully",
        message.into(),
    ))
}

// =============================================================================
// GET /get-messages - session
// =============================================================================

pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<ApiResponse<MessagesResponse>, MessageError> {
    let messages = state.messages.list(&session.account_id).await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "messages fetched successfully",
        MessagesResponse {
            messages: messages.into_iter().map(Into::into).collect(),
        },
    ))
}

// =============================================================================
// DELETE /delete-message/{id} - session
// =============================================================================

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, MessageError> {
    state.messages.delete(&session.account_id, &id).await?;

    Ok(ApiResponse::empty(StatusCode::OK, "message deleted successfully"))
}
