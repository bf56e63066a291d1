//! Transactional Persistence Facade
//!
//! Postgres implementation of [`ChatPersistence`]. Every operation opens one
//! READ COMMITTED transaction through [`TxManager`] and writes the business
//! change together with its audit entry; if either write fails, both roll
//! back. Reads are audited too, matching the audit-trail completeness
//! invariant.

use async_trait::async_trait;

use crate::application::ports::ChatPersistence;
use crate::domain::{
    AuditEntry, AuditStore, Chat, ChatInfo, ChatMessage, ChatStore, MessageStore,
};
use crate::infrastructure::database::TxManager;
use crate::infrastructure::repositories::{PgAuditStore, PgChatStore, PgMessageStore};
use crate::shared::error::AppError;

/// Postgres-backed [`ChatPersistence`].
#[derive(Clone)]
pub struct PgChatPersistence {
    tx: TxManager,
}

impl PgChatPersistence {
    pub fn new(tx: TxManager) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ChatPersistence for PgChatPersistence {
    async fn create_chat(&self, info: &ChatInfo) -> Result<i64, AppError> {
        let info = info.clone();
        self.tx
            .read_committed(move |conn| {
                Box::pin(async move {
                    let id = PgChatStore.create(&mut *conn, &info).await?;
                    let entry = AuditEntry::new(
                        id,
                        format!("Create chat: usernames: {}", info.usernames.join(", ")),
                    );
                    PgAuditStore.append(&mut *conn, &entry).await?;
                    Ok(id)
                })
            })
            .await
    }

    async fn get_chat(&self, id: i64) -> Result<Chat, AppError> {
        self.tx
            .read_committed(move |conn| {
                Box::pin(async move {
                    let chat = PgChatStore
                        .get(&mut *conn, id)
                        .await?
                        .ok_or_else(|| AppError::NotFound(format!("chat {id} not found")))?;
                    let entry = AuditEntry::new(
                        id,
                        format!(
                            "Get chat: id: {}, usernames: {}",
                            id,
                            chat.usernames.join(", ")
                        ),
                    );
                    PgAuditStore.append(&mut *conn, &entry).await?;
                    Ok(chat)
                })
            })
            .await
    }

    async fn delete_chat(&self, id: i64) -> Result<(), AppError> {
        self.tx
            .read_committed(move |conn| {
                Box::pin(async move {
                    let removed = PgChatStore.delete(&mut *conn, id).await?;
                    if removed == 0 {
                        return Err(AppError::NotFound(format!("chat {id} not found")));
                    }
                    let entry = AuditEntry::new(id, format!("Delete chat: id: {id}"));
                    PgAuditStore.append(&mut *conn, &entry).await?;
                    Ok(())
                })
            })
            .await
    }

    async fn record_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        let message = message.clone();
        self.tx
            .read_committed(move |conn| {
                Box::pin(async move {
                    PgMessageStore.insert(&mut *conn, &message).await?;
                    let entry = AuditEntry::new(
                        message.chat_id,
                        format!(
                            "Send message: chat_id: {}, from: {}, created_at: {}",
                            message.chat_id, message.sender, message.created_at
                        ),
                    );
                    PgAuditStore.append(&mut *conn, &entry).await?;
                    Ok(())
                })
            })
            .await
    }
}
