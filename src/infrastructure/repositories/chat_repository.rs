//! Chat Store Implementation
//!
//! PostgreSQL implementation of chat record operations. All methods run on
//! the caller's transaction-scoped connection.

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::domain::{Chat, ChatInfo, ChatStore};
use crate::shared::error::AppError;

/// PostgreSQL chat store.
pub struct PgChatStore;

/// Internal row type for chat queries.
#[derive(Debug, sqlx::FromRow)]
struct ChatRow {
    id: i64,
    usernames: Vec<String>,
}

impl ChatRow {
    fn into_chat(self) -> Chat {
        Chat {
            id: self.id,
            usernames: self.usernames,
        }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn create(&self, conn: &mut PgConnection, info: &ChatInfo) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO chats (usernames)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(&info.usernames)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    async fn get(&self, conn: &mut PgConnection, id: i64) -> Result<Option<Chat>, AppError> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, usernames
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(|r| r.into_chat()))
    }

    async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
