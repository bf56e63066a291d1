//! Audit Store Implementation
//!
//! PostgreSQL implementation of the append-only audit trail.

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::domain::{AuditEntry, AuditStore};
use crate::shared::error::AppError;

/// PostgreSQL audit store.
pub struct PgAuditStore;

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(&self, conn: &mut PgConnection, entry: &AuditEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (chat_id, activity, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.chat_id)
        .bind(&entry.activity)
        .bind(entry.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
