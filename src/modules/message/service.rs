use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::interface::{MessageError, MessageStore, Result};
use super::model::Message;
use crate::modules::auth::interface::AccountStore;

/// Anonymous inbox: anyone may post to an account that accepts messages,
/// only the owner reads or deletes.
pub struct MessageService {
    accounts: Arc<dyn AccountStore>,
    messages: Arc<dyn MessageStore>,
}

impl MessageService {
    pub fn new(accounts: Arc<dyn AccountStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self { accounts, messages }
    }

    pub async fn send(&self, identifier: &str, content: &str) -> Result<Message> {
        let recipient = self
            .accounts
            .find_by_identifier(identifier)
            .await?
            .ok_or(MessageError::RecipientNotFound)?;

        if !recipient.accepting_messages {
            return Err(MessageError::NotAccepting);
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            account_id: recipient.id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.messages.add(&message).await?;

        Ok(message)
    }

    pub async fn list(&self, account_id: &str) -> Result<Vec<Message>> {
        let messages = self.messages.list(account_id).await?;
        if messages.is_empty() {
            return Err(MessageError::NoMessages);
        }
        Ok(messages)
    }

    pub async fn delete(&self, account_id: &str, message_id: &str) -> Result<()> {
        if !self.messages.delete(account_id, message_id).await? {
            return Err(MessageError::MessageNotFound);
        }
        Ok(())
    }
}
