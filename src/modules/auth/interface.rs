use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use super::model::Account;
use crate::modules::response::ApiResponse;
use crate::services::{hashing::HashingError, notifier::NotifyError};

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate entry")]
    Duplicate,

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable account records. Every method is a single atomic row operation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Whether any account already uses this username or this email.
    async fn exists(&self, username: &str, email: &str) -> StoreResult<bool>;

    /// Insert a new account; `StoreError::Duplicate` on a unique key violation.
    async fn create(&self, account: &Account) -> StoreResult<()>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Match on username or email.
    async fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Account>>;

    /// Overwrite the pending code of an unverified account. Returns false if no
    /// unverified account with this id exists.
    async fn set_pending_code(
        &self,
        id: &str,
        code: u32,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Flip the account to verified and clear its code, provided the stored
    /// code is still `code`. Returns false when nothing matched.
    async fn mark_verified(&self, id: &str, code: u32) -> StoreResult<bool>;

    async fn set_accepting_messages(&self, id: &str, enabled: bool) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}

// =============================================================================
// ERRORS
// =============================================================================

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("username/email already taken")]
    Conflict,

    #[error("user not found")]
    NotFound,

    #[error("invalid credentials")]
    BadCredentials,

    #[error("invalid verify code")]
    CodeMismatch,

    #[error("verify code expired")]
    CodeExpired,

    #[error("user is not verified, check your email for a verification code")]
    NotVerified,

    #[error("user is already verified")]
    AlreadyVerified,

    #[error("unauthorized")]
    Unauthorized,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] HashingError),

    #[error("error sending email verification code: {0}")]
    Notification(#[from] NotifyError),

    #[error("account settings were not updated")]
    NotUpdated,

    #[error("error issuing session token: {0}")]
    TokenIssuance(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadCredentials => StatusCode::BAD_REQUEST,
            Self::CodeMismatch => StatusCode::BAD_REQUEST,
            Self::CodeExpired => StatusCode::BAD_REQUEST,
            Self::NotVerified => StatusCode::BAD_REQUEST,
            Self::AlreadyVerified => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotUpdated => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TokenIssuance(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::Hashing(_) => "internal server error",
            Self::Notification(_) => "error sending email verification code",
            Self::NotUpdated => "error updating accept messages status",
            Self::TokenIssuance(_) => "error signing in",
            Self::Store(_) => "internal server error",
            _ => "request rejected",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            return ApiResponse::internal(self.public_message(), &self).into_response();
        }

        tracing::debug!("Auth request rejected: {}", self);
        let message = self.to_string();
        ApiResponse::failure(status, message.clone(), message).into_response()
    }
}
