use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::interface::{AccountStore, StoreError, StoreResult};
use super::model::{Account, Verification};

/// Process-local account store for tests and database-less development.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

/// Usernames and emails compare case-insensitively, as under the accounts table collation.
fn same_key(stored: &str, candidate: &str) -> bool {
    stored.to_lowercase() == candidate.to_lowercase()
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn exists(&self, username: &str, email: &str) -> StoreResult<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .any(|a| same_key(&a.username, username) || same_key(&a.email, email)))
    }

    async fn create(&self, account: &Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().await;
        let taken = accounts.values().any(|a| {
            a.id == account.id
                || same_key(&a.username, &account.username)
                || same_key(&a.email, &account.email)
        });
        if taken {
            return Err(StoreError::Duplicate);
        }

        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| same_key(&a.username, username))
            .cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| same_key(&a.username, identifier) || same_key(&a.email, identifier))
            .cloned())
    }

    async fn set_pending_code(
        &self,
        id: &str,
        code: u32,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(id) {
            Some(account) if !account.is_verified() => {
                account.verification = Verification::Pending { code, expires_at };
                account.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_verified(&self, id: &str, code: u32) -> StoreResult<bool> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(id) {
            Some(account) => match account.verification {
                Verification::Pending { code: stored, .. } if stored == code => {
                    account.verification = Verification::Verified;
                    account.updated_at = Utc::now();
                    Ok(true)
                }
                _ => Ok(false),
            },
            None => Ok(false),
        }
    }

    async fn set_accepting_messages(&self, id: &str, enabled: bool) -> StoreResult<bool> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(id) {
            Some(account) => {
                account.accepting_messages = enabled;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
