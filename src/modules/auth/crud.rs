use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use super::interface::{AccountStore, StoreError, StoreResult};
use super::model::{Account, AccountRow, Verification};

/// MySQL-backed account store.
#[derive(Clone)]
pub struct AccountCrud {
    pool: Pool<MySql>,
}

impl AccountCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    async fn fetch_one(&self, sql: &str, binds: &[&str]) -> StoreResult<Option<Account>> {
        let mut query = sqlx::query_as::<_, AccountRow>(sql);
        for value in binds {
            query = query.bind(*value);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }
}

fn is_duplicate(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AccountStore for AccountCrud {
    async fn exists(&self, username: &str, email: &str) -> StoreResult<bool> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE username = ? OR email = ?")
                .bind(username)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0 > 0)
    }

    async fn create(&self, account: &Account) -> StoreResult<()> {
        let (is_verified, code, expires_at) = match account.verification {
            Verification::Unverified => (false, None, None),
            Verification::Pending { code, expires_at } => (false, Some(code), Some(expires_at)),
            Verification::Verified => (true, None, None),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, is_verified, is_accepting_messages,
                                  verify_code, verify_code_expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(is_verified)
        .bind(account.accepting_messages)
        .bind(code)
        .bind(expires_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate(&e) => Err(StoreError::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        self.fetch_one("SELECT * FROM accounts WHERE id = ?", &[id]).await
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        self.fetch_one("SELECT * FROM accounts WHERE username = ?", &[username])
            .await
    }

    async fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Account>> {
        self.fetch_one(
            "SELECT * FROM accounts WHERE username = ? OR email = ? LIMIT 1",
            &[identifier, identifier],
        )
        .await
    }

    async fn set_pending_code(
        &self,
        id: &str,
        code: u32,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        // updated_at always changes, so rows_affected counts matched rows.
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET verify_code = ?, verify_code_expires_at = ?, updated_at = ?
            WHERE id = ? AND is_verified = FALSE
            "#,
        )
        .bind(code)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_verified(&self, id: &str, code: u32) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_verified = TRUE, verify_code = NULL, verify_code_expires_at = NULL, updated_at = ?
            WHERE id = ? AND is_verified = FALSE AND verify_code = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_accepting_messages(&self, id: &str, enabled: bool) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET is_accepting_messages = ?, updated_at = ? WHERE id = ?",
        )
        .bind(enabled)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
