//! Chat entity and store trait.
//!
//! Maps to the `chats` table in the database schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::shared::error::AppError;

/// A chat room record: identity plus participant usernames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub usernames: Vec<String>,
}

/// Data needed to create a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub usernames: Vec<String>,
}

/// Chat persistence operations.
///
/// All methods take a transaction-scoped connection so they can participate
/// in a surrounding transaction.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Insert a chat and return its generated id.
    async fn create(&self, conn: &mut PgConnection, info: &ChatInfo) -> Result<i64, AppError>;

    /// Fetch a chat by id; `None` if it does not exist.
    async fn get(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Chat>, AppError>;

    /// Delete a chat by id; returns the number of rows removed.
    async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<u64, AppError>;
}
