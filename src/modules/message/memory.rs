use async_trait::async_trait;
use tokio::sync::RwLock;

use super::interface::MessageStore;
use super::model::Message;
use crate::modules::auth::interface::StoreResult;

#[derive(Default)]
pub struct MemoryMessageStore {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn add(&self, message: &Message) -> StoreResult<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn list(&self, account_id: &str) -> StoreResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut owned: Vec<Message> = messages
            .iter()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete(&self, account_id: &str, message_id: &str) -> StoreResult<bool> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| !(m.id == message_id && m.account_id == account_id));
        Ok(messages.len() < before)
    }
}
