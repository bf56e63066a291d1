//! Chat message value type and store trait.
//!
//! Maps to the `messages` table. A message is immutable once constructed;
//! the same value is persisted and fanned out to live subscribers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::shared::error::AppError;

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub sender: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(chat_id: i64, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            sender: sender.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Message persistence operations.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a message within the surrounding transaction.
    async fn insert(&self, conn: &mut PgConnection, message: &ChatMessage)
        -> Result<(), AppError>;
}
