//! Audit log entry and store trait.
//!
//! Every business mutation writes one entry in the same transaction.
//! Entries are append-only; nothing in this subsystem updates or deletes them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::shared::error::AppError;

/// One audit trail entry describing an operation on a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub chat_id: i64,
    pub activity: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(chat_id: i64, activity: impl Into<String>) -> Self {
        Self {
            chat_id,
            activity: activity.into(),
            created_at: Utc::now(),
        }
    }
}

/// Audit trail persistence.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry within the surrounding transaction.
    async fn append(&self, conn: &mut PgConnection, entry: &AuditEntry) -> Result<(), AppError>;
}
