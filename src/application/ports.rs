//! Ports consumed by the dispatcher.
//!
//! `AccessPort` is the external access-control capability; `ChatPersistence`
//! is the transactional write path. Both are trait objects so tests can swap
//! in stubs.

use async_trait::async_trait;

use crate::domain::{Chat, ChatInfo, ChatMessage};
use crate::shared::error::AppError;

/// External access-control service.
///
/// `check` asks whether the caller may invoke the given endpoint; a denial is
/// propagated verbatim, no local retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessPort: Send + Sync {
    async fn check(&self, endpoint: &str) -> Result<(), AppError>;
}

/// Transactional persistence for chats, messages, and their audit trail.
///
/// Each method is one atomic unit: the business write and its audit entry
/// commit together or not at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPersistence: Send + Sync {
    /// Insert a chat plus its audit entry; returns the new chat id.
    async fn create_chat(&self, info: &ChatInfo) -> Result<i64, AppError>;

    /// Read a chat (audited like the mutations); `NotFound` if missing.
    async fn get_chat(&self, id: i64) -> Result<Chat, AppError>;

    /// Delete a chat plus its audit entry; `NotFound` if missing.
    async fn delete_chat(&self, id: i64) -> Result<(), AppError>;

    /// Persist a message plus its audit entry.
    async fn record_message(&self, message: &ChatMessage) -> Result<(), AppError>;
}
