use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::model::Message;
use crate::modules::auth::interface::{StoreError, StoreResult};
use crate::modules::response::ApiResponse;

/// Append-only message inbox per account.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn add(&self, message: &Message) -> StoreResult<()>;

    /// Newest first.
    async fn list(&self, account_id: &str) -> StoreResult<Vec<Message>>;

    /// Returns false when the account owns no message with this id.
    async fn delete(&self, account_id: &str, message_id: &str) -> StoreResult<bool>;
}

pub type Result<T> = std::result::Result<T, MessageError>;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("{0}")]
    Validation(String),

    #[error("user not found")]
    RecipientNotFound,

    #[error("user is not accepting messages")]
    NotAccepting,

    #[error("no messages found")]
    NoMessages,

    #[error("message not found")]
    MessageNotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl MessageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RecipientNotFound => StatusCode::NOT_FOUND,
            Self::NotAccepting => StatusCode::FORBIDDEN,
            Self::NoMessages => StatusCode::NOT_FOUND,
            Self::MessageNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            return ApiResponse::internal("internal server error", &self).into_response();
        }

        let message = self.to_string();
        ApiResponse::failure(status, message.clone(), message).into_response()
    }
}
