use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::MessageStore;
use super::model::Message;
use crate::modules::auth::interface::StoreResult;

/// MySQL-backed message store.
#[derive(Clone)]
pub struct MessageCrud {
    pool: Pool<MySql>,
}

impl MessageCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageCrud {
    async fn add(&self, message: &Message) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, account_id, content, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.account_id)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, account_id: &str) -> StoreResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE account_id = ? ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn delete(&self, account_id: &str, message_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ? AND account_id = ?")
            .bind(message_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
