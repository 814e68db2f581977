//! Email verification lifecycle: registration, code re-issue and code consumption.

use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::interface::{AccountStore, AuthError, Result, StoreError};
use super::model::{Account, Verification};
use crate::services::notifier::Notifier;
use crate::services::{hashing, otp};

/// Whether registration mails the code before or after the account row is written.
///
/// `NotifyFirst` never persists an account whose owner did not receive a code,
/// but drops the whole registration when the mail provider fails.
/// `PersistFirst` keeps the account and reports the delivery failure; the
/// next sign-in attempt sends a fresh code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationOrder {
    #[default]
    NotifyFirst,
    PersistFirst,
}

impl FromStr for RegistrationOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "notify-first" => Ok(Self::NotifyFirst),
            "persist-first" => Ok(Self::PersistFirst),
            other => Err(format!("unknown registration order: {}", other)),
        }
    }
}

pub struct VerificationService {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    order: RegistrationOrder,
}

impl VerificationService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        order: RegistrationOrder,
    ) -> Self {
        Self {
            store,
            notifier,
            order,
        }
    }

    /// Create an unverified account and mail its first code. Returns the new account id.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        if self.store.exists(username, email).await? {
            return Err(AuthError::Conflict);
        }

        let password_hash = hashing::hash_password(password)?;

        let now = Utc::now();
        let code = otp::generate_code();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            verification: Verification::Pending {
                code,
                expires_at: otp::code_expiry(now),
            },
            accepting_messages: true,
            created_at: now,
            updated_at: now,
        };

        match self.order {
            RegistrationOrder::NotifyFirst => {
                self.notify(&account, code).await?;
                self.persist(&account).await?;
            }
            RegistrationOrder::PersistFirst => {
                self.persist(&account).await?;
                self.notify(&account, code).await?;
            }
        }

        tracing::info!("Registered account {} ({})", account.id, account.username);
        Ok(account.id)
    }

    /// Replace the pending code of an unverified account and mail the new one.
    ///
    /// A failed delivery leaves the new code stored.
    pub async fn reissue(&self, account_id: &str) -> Result<()> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }

        let code = otp::generate_code();
        let expires_at = otp::code_expiry(Utc::now());

        if !self
            .store
            .set_pending_code(&account.id, code, expires_at)
            .await?
        {
            // Verified or gone since the lookup above.
            return Err(AuthError::NotFound);
        }

        self.notify(&account, code).await?;

        tracing::info!("Reissued verification code for account {}", account.id);
        Ok(())
    }

    pub async fn consume(&self, username: &str, code: u32) -> Result<String> {
        self.consume_at(username, code, Utc::now()).await
    }

    /// Check `code` against the stored one as of `now` and verify the account on a match.
    pub async fn consume_at(&self, username: &str, code: u32, now: DateTime<Utc>) -> Result<String> {
        let account = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::NotFound)?;

        let (stored, expires_at) = match account.verification {
            Verification::Pending { code, expires_at } => (code, expires_at),
            Verification::Unverified | Verification::Verified => return Err(AuthError::NotFound),
        };

        // The expired code stays in place until a reissue replaces it.
        if now > expires_at {
            return Err(AuthError::CodeExpired);
        }

        if code != stored {
            return Err(AuthError::CodeMismatch);
        }

        if !self.store.mark_verified(&account.id, stored).await? {
            // Replaced by a concurrent reissue.
            return Err(AuthError::CodeMismatch);
        }

        tracing::info!("Account {} verified", account.id);
        Ok(account.id)
    }

    async fn persist(&self, account: &Account) -> Result<()> {
        match self.store.create(account).await {
            Ok(()) => Ok(()),
            Err(StoreError::Duplicate) => Err(AuthError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn notify(&self, account: &Account, code: u32) -> Result<()> {
        self.notifier
            .send_verification_code(&account.username, &account.email, code)
            .await
            .map_err(|e| {
                tracing::warn!("Verification code for {} was not delivered: {}", account.username, e);
                AuthError::Notification(e)
            })
    }
}
