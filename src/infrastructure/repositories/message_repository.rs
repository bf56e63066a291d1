//! Message Store Implementation
//!
//! PostgreSQL implementation of message persistence.

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::domain::{ChatMessage, MessageStore};
use crate::shared::error::AppError;

/// PostgreSQL message store.
pub struct PgMessageStore;

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn insert(
        &self,
        conn: &mut PgConnection,
        message: &ChatMessage,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO messages (chat_id, sender, text, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(message.chat_id)
        .bind(&message.sender)
        .bind(&message.text)
        .bind(message.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
