use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// SIGN UP
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountIdResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
}

// =============================================================================
// VERIFY
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub username: Option<String>,
    pub code: Option<String>,
}

// =============================================================================
// SIGN IN
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
}

// =============================================================================
// ACCEPT MESSAGES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AcceptMessagesQuery {
    pub is_accepting_messages: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AcceptMessagesResponse {
    pub is_accepting_messages: bool,
}
