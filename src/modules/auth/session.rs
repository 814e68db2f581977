use axum::http::{header::InvalidHeaderValue, HeaderValue};
use std::sync::Arc;

use super::interface::{AccountStore, AuthError, Result};
use super::verification::VerificationService;
use crate::services::{hashing, jwt::JwtService};

pub const SESSION_COOKIE_NAME: &str = "token";

#[derive(Debug)]
pub struct SignedIn {
    pub account_id: String,
    pub token: String,
}

/// Sign-in and the account settings that require a session.
pub struct SessionService {
    store: Arc<dyn AccountStore>,
    verification: Arc<VerificationService>,
    jwt: Arc<JwtService>,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        verification: Arc<VerificationService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            verification,
            jwt,
        }
    }

    /// Check credentials and hand out a session token.
    ///
    /// Unverified accounts are always refused; the attempt mails them a fresh code.
    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<SignedIn> {
        let account = self
            .store
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !hashing::verify_password(password, &account.password_hash) {
            return Err(AuthError::BadCredentials);
        }

        if !account.is_verified() {
            if let Err(e) = self.verification.reissue(&account.id).await {
                tracing::warn!("Could not reissue code for account {}: {}", account.id, e);
            }
            return Err(AuthError::NotVerified);
        }

        let token = self
            .jwt
            .issue(&account.id)
            .map_err(|e| AuthError::TokenIssuance(e.to_string()))?;

        tracing::info!("Account {} signed in", account.id);
        Ok(SignedIn {
            account_id: account.id,
            token,
        })
    }

    /// Returns false when no account has this id.
    pub async fn toggle_accepting_messages(&self, account_id: &str, enabled: bool) -> Result<bool> {
        Ok(self.store.set_accepting_messages(account_id, enabled).await?)
    }

    pub async fn accepting_messages(&self, account_id: &str) -> Result<bool> {
        self.store
            .find_by_id(account_id)
            .await?
            .map(|account| account.accepting_messages)
            .ok_or(AuthError::NotFound)
    }

    pub fn session_duration_secs(&self) -> i64 {
        self.jwt.session_duration_secs()
    }
}

/// `HttpOnly` cookie carrying the session token.
pub fn session_cookie(token: &str, max_age_secs: i64) -> std::result::Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    ))
}

/// Sign-out is client side only: tell the browser to drop the cookie.
pub fn cleared_session_cookie() -> HeaderValue {
    HeaderValue::from_static("token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
