//! Chat Service
//!
//! Orchestrates each chat operation: validation, the external access check,
//! the transactional write, and the post-commit fan-out. Ordering is strict:
//! an access denial stops the call before any persistence, and a persistence
//! failure stops the call before any publish.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{AccessPort, ChatPersistence};
use crate::domain::{Chat, ChatInfo, ChatMessage};
use crate::presentation::stream::RoomHub;
use crate::shared::error::AppError;

/// Endpoint address sent to the access-control service for message sends.
const SEND_MESSAGE_ENDPOINT: &str = "/chat/v1/send-message";

/// Per-request orchestrator for all chat operations.
pub struct ChatService {
    access: Arc<dyn AccessPort>,
    persistence: Arc<dyn ChatPersistence>,
    hub: Arc<RoomHub>,
}

impl ChatService {
    pub fn new(
        access: Arc<dyn AccessPort>,
        persistence: Arc<dyn ChatPersistence>,
        hub: Arc<RoomHub>,
    ) -> Self {
        Self {
            access,
            persistence,
            hub,
        }
    }

    /// Create a chat for the given participants and return its id.
    pub async fn create_chat(
        &self,
        usernames: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<i64, AppError> {
        if usernames.is_empty() {
            return Err(AppError::Validation(
                "at least one username is required".into(),
            ));
        }
        if usernames.iter().any(|u| u.trim().is_empty()) {
            return Err(AppError::Validation("usernames must not be blank".into()));
        }

        let info = ChatInfo { usernames };
        let id = guarded(cancel, self.persistence.create_chat(&info)).await?;

        tracing::info!(chat_id = id, "Chat created");
        Ok(id)
    }

    /// Fetch a chat by id.
    pub async fn get_chat(&self, id: i64, cancel: &CancellationToken) -> Result<Chat, AppError> {
        guarded(cancel, self.persistence.get_chat(id)).await
    }

    /// Delete a chat and close its room, disconnecting subscribers.
    pub async fn delete_chat(&self, id: i64, cancel: &CancellationToken) -> Result<(), AppError> {
        guarded(cancel, self.persistence.delete_chat(id)).await?;
        self.hub.close(id);

        tracing::info!(chat_id = id, "Chat deleted");
        Ok(())
    }

    /// Persist a message and fan it out to the chat's subscribers.
    ///
    /// The access check runs first; a denial leaves no trace. The publish
    /// runs only after the write committed, and a publish failure does not
    /// undo the write or fail the call.
    pub async fn send_message(
        &self,
        message: ChatMessage,
        cancel: &CancellationToken,
    ) -> Result<(), AppError> {
        if message.sender.trim().is_empty() {
            return Err(AppError::Validation("sender must not be blank".into()));
        }
        if message.text.trim().is_empty() {
            return Err(AppError::Validation("text must not be blank".into()));
        }

        guarded(cancel, self.access.check(SEND_MESSAGE_ENDPOINT)).await?;
        guarded(cancel, self.persistence.record_message(&message)).await?;

        // Committed; delivery is best effort from here.
        if let Err(e) = self.hub.publish(message) {
            tracing::warn!(error = %e, "Message committed but not fanned out");
        }
        Ok(())
    }

    /// Existence check used before accepting a streaming join.
    pub async fn chat_exists(&self, id: i64) -> Result<(), AppError> {
        self.persistence.get_chat(id).await.map(|_| ())
    }
}

/// Run `fut` unless `cancel` fires first; a fired token aborts the step.
async fn guarded<T>(
    cancel: &CancellationToken,
    fut: impl std::future::Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    match cancel.run_until_cancelled(fut).await {
        Some(result) => result,
        None => Err(AppError::DeadlineExceeded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAccessPort, MockChatPersistence};

    fn message(chat_id: i64) -> ChatMessage {
        ChatMessage::new(chat_id, "alice", "hi")
    }

    fn service(
        access: MockAccessPort,
        persistence: MockChatPersistence,
        hub: Arc<RoomHub>,
    ) -> ChatService {
        ChatService::new(Arc::new(access), Arc::new(persistence), hub)
    }

    #[tokio::test]
    async fn access_denial_stops_before_persistence() {
        let mut access = MockAccessPort::new();
        access
            .expect_check()
            .returning(|_| Err(AppError::AccessDenied("no".into())));
        // No persistence expectations: any call would panic.
        let persistence = MockChatPersistence::new();
        let hub = Arc::new(RoomHub::new(16));

        let svc = service(access, persistence, hub.clone());
        let err = svc
            .send_message(message(1), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AccessDenied(_)));
        assert_eq!(hub.room_count(), 0);
    }

    #[tokio::test]
    async fn persistence_failure_stops_before_publish() {
        let mut access = MockAccessPort::new();
        access.expect_check().returning(|_| Ok(()));
        let mut persistence = MockChatPersistence::new();
        persistence
            .expect_record_message()
            .returning(|_| Err(AppError::Internal("db down".into())));
        let hub = Arc::new(RoomHub::new(16));

        let svc = service(access, persistence, hub.clone());
        let err = svc
            .send_message(message(1), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(hub.room_count(), 0, "publish must not run after a failed write");
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_call() {
        let mut access = MockAccessPort::new();
        access.expect_check().returning(|_| Ok(()));
        let mut persistence = MockChatPersistence::new();
        persistence.expect_record_message().returning(|_| Ok(()));

        // Capacity-one mailbox, pre-filled so the publish is rejected.
        let hub = Arc::new(RoomHub::new(1));
        hub.publish(message(7)).unwrap();

        let svc = service(access, persistence, hub);
        let result = svc.send_message(message(7), &CancellationToken::new()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn blank_sender_is_rejected_without_side_effects() {
        let access = MockAccessPort::new();
        let persistence = MockChatPersistence::new();
        let hub = Arc::new(RoomHub::new(16));

        let svc = service(access, persistence, hub);
        let mut m = message(1);
        m.sender = "  ".into();
        let err = svc
            .send_message(m, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_usernames_rejected_on_create() {
        let access = MockAccessPort::new();
        let persistence = MockChatPersistence::new();
        let hub = Arc::new(RoomHub::new(16));

        let svc = service(access, persistence, hub);
        let err = svc
            .create_chat(vec![], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_closes_the_room() {
        let access = MockAccessPort::new();
        let mut persistence = MockChatPersistence::new();
        persistence.expect_delete_chat().returning(|_| Ok(()));
        let hub = Arc::new(RoomHub::new(16));
        hub.publish(message(5)).unwrap();
        assert_eq!(hub.room_count(), 1);

        let svc = service(access, persistence, hub.clone());
        svc.delete_chat(5, &CancellationToken::new()).await.unwrap();

        assert_eq!(hub.room_count(), 0);
    }

    #[tokio::test]
    async fn fired_token_aborts_before_any_call() {
        let access = MockAccessPort::new();
        let persistence = MockChatPersistence::new();
        let hub = Arc::new(RoomHub::new(16));

        let cancel = CancellationToken::new();
        cancel.cancel();

        let svc = service(access, persistence, hub);
        let err = svc.send_message(message(1), &cancel).await.unwrap_err();

        assert!(matches!(err, AppError::DeadlineExceeded));
    }
}
