//! End-to-end dispatch flow over the library API: create a chat, join it,
//! send a message, and observe the fan-out. Persistence is an in-memory
//! stub; the hub and dispatcher are the real ones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use chat_relay::application::ports::{AccessPort, ChatPersistence};
use chat_relay::application::services::ChatService;
use chat_relay::domain::{Chat, ChatInfo, ChatMessage};
use chat_relay::presentation::stream::RoomHub;
use chat_relay::shared::error::AppError;

/// Access stub that admits everything.
struct OpenAccess;

#[async_trait]
impl AccessPort for OpenAccess {
    async fn check(&self, _endpoint: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Access stub that denies everything.
struct ClosedAccess;

#[async_trait]
impl AccessPort for ClosedAccess {
    async fn check(&self, _endpoint: &str) -> Result<(), AppError> {
        Err(AppError::AccessDenied("denied by policy".into()))
    }
}

/// In-memory stand-in for the Postgres persistence.
#[derive(Default)]
struct MemoryPersistence {
    chats: Mutex<HashMap<i64, Chat>>,
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ChatPersistence for MemoryPersistence {
    async fn create_chat(&self, info: &ChatInfo) -> Result<i64, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.chats.lock().insert(
            id,
            Chat {
                id,
                usernames: info.usernames.clone(),
            },
        );
        Ok(id)
    }

    async fn get_chat(&self, id: i64) -> Result<Chat, AppError> {
        self.chats
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Chat {id} not found")))
    }

    async fn delete_chat(&self, id: i64) -> Result<(), AppError> {
        self.chats
            .lock()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Chat {id} not found")))
    }

    async fn record_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        self.messages.lock().push(message.clone());
        Ok(())
    }
}

fn build_service(
    access: Arc<dyn AccessPort>,
    persistence: Arc<MemoryPersistence>,
) -> (Arc<ChatService>, Arc<RoomHub>) {
    let hub = Arc::new(RoomHub::new(100));
    let service = Arc::new(ChatService::new(access, persistence, hub.clone()));
    (service, hub)
}

#[tokio::test]
async fn create_join_send_receive() {
    let persistence = Arc::new(MemoryPersistence::default());
    let (service, hub) = build_service(Arc::new(OpenAccess), persistence.clone());
    let cancel = CancellationToken::new();

    let chat_id = service
        .create_chat(vec!["alice".into(), "bob".into()], &cancel)
        .await
        .unwrap();

    // Bob joins the chat stream.
    let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
    let bob_cancel = CancellationToken::new();
    let bob_hub = hub.clone();
    let bob = tokio::spawn({
        let bob_cancel = bob_cancel.clone();
        async move {
            bob_hub.subscribe(chat_id, "bob", bob_tx, bob_cancel).await;
        }
    });

    // Let the subscriber loop register before sending.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Alice sends; bob receives; alice does not echo back to herself.
    let message = ChatMessage::new(chat_id, "alice", "hi");
    service.send_message(message.clone(), &cancel).await.unwrap();

    let received = timeout(Duration::from_secs(1), bob_rx.recv())
        .await
        .expect("bob should receive within a second")
        .expect("sink should stay open");
    assert_eq!(received.sender, "alice");
    assert_eq!(received.text, "hi");

    // The write committed regardless of delivery.
    assert_eq!(persistence.messages.lock().len(), 1);

    // The chat is still readable after the send.
    let chat = service.get_chat(chat_id, &cancel).await.unwrap();
    assert_eq!(chat.usernames, vec!["alice".to_string(), "bob".to_string()]);

    bob_cancel.cancel();
    bob.await.unwrap();
}

#[tokio::test]
async fn sender_does_not_receive_own_message() {
    let persistence = Arc::new(MemoryPersistence::default());
    let (service, hub) = build_service(Arc::new(OpenAccess), persistence);
    let cancel = CancellationToken::new();

    let chat_id = service
        .create_chat(vec!["alice".into(), "bob".into()], &cancel)
        .await
        .unwrap();

    let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
    let alice_cancel = CancellationToken::new();
    let alice_hub = hub.clone();
    let alice = tokio::spawn({
        let alice_cancel = alice_cancel.clone();
        async move {
            alice_hub
                .subscribe(chat_id, "alice", alice_tx, alice_cancel)
                .await;
        }
    });

    let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
    let bob_cancel = CancellationToken::new();
    let bob_hub = hub.clone();
    let bob = tokio::spawn({
        let bob_cancel = bob_cancel.clone();
        async move {
            bob_hub.subscribe(chat_id, "bob", bob_tx, bob_cancel).await;
        }
    });

    // Both loops must be registered before the send.
    tokio::time::sleep(Duration::from_millis(50)).await;

    service
        .send_message(ChatMessage::new(chat_id, "alice", "only for bob"), &cancel)
        .await
        .unwrap();

    let received = timeout(Duration::from_secs(1), bob_rx.recv())
        .await
        .expect("bob should receive")
        .expect("sink open");
    assert_eq!(received.text, "only for bob");

    // Alice's sink stays empty.
    assert!(
        timeout(Duration::from_millis(100), alice_rx.recv())
            .await
            .is_err(),
        "sender must not receive their own message"
    );

    alice_cancel.cancel();
    bob_cancel.cancel();
    alice.await.unwrap();
    bob.await.unwrap();
}

#[tokio::test]
async fn deleting_a_chat_disconnects_its_subscribers() {
    let persistence = Arc::new(MemoryPersistence::default());
    let (service, hub) = build_service(Arc::new(OpenAccess), persistence);
    let cancel = CancellationToken::new();

    let chat_id = service
        .create_chat(vec!["alice".into(), "bob".into()], &cancel)
        .await
        .unwrap();

    let (bob_tx, _bob_rx) = mpsc::unbounded_channel();
    let bob_hub = hub.clone();
    let bob = tokio::spawn(async move {
        bob_hub
            .subscribe(chat_id, "bob", bob_tx, CancellationToken::new())
            .await;
    });

    // Let the subscriber register before deleting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(hub.subscriber_count(chat_id), 1);

    service.delete_chat(chat_id, &cancel).await.unwrap();

    timeout(Duration::from_secs(1), bob)
        .await
        .expect("subscriber loop should end when the chat is deleted")
        .unwrap();
    assert_eq!(hub.room_count(), 0);

    let err = service.get_chat(chat_id, &cancel).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn denied_send_leaves_no_trace() {
    let persistence = Arc::new(MemoryPersistence::default());
    let (service, _hub) = build_service(Arc::new(ClosedAccess), persistence.clone());
    let cancel = CancellationToken::new();

    let chat_id = service
        .create_chat(vec!["alice".into()], &cancel)
        .await
        .unwrap();

    let err = service
        .send_message(ChatMessage::new(chat_id, "alice", "hi"), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AccessDenied(_)));
    assert!(persistence.messages.lock().is_empty());
}
