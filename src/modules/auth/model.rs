use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::interface::StoreError;

/// Where an account stands in the email verification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// No code has been issued yet.
    Unverified,
    Pending {
        code: u32,
        expires_at: DateTime<Utc>,
    },
    Verified,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verification: Verification,
    pub accepting_messages: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_verified(&self) -> bool {
        matches!(self.verification, Verification::Verified)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub verify_code: Option<u32>,
    pub verify_code_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let verification = match (row.is_verified, row.verify_code, row.verify_code_expires_at) {
            (true, None, None) => Verification::Verified,
            (false, Some(code), Some(expires_at)) => Verification::Pending { code, expires_at },
            (false, None, None) => Verification::Unverified,
            _ => {
                return Err(StoreError::Corrupt(format!(
                    "account {} has an inconsistent verification state",
                    row.id
                )))
            }
        };

        Ok(Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            verification,
            accepting_messages: row.is_accepting_messages,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
