use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Message {
    pub id: String,
    pub account_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
