//! Room Hub
//!
//! In-process publish/subscribe for live message delivery. Each room owns a
//! bounded mailbox of pending messages and a registry of subscriber sinks;
//! subscriber tasks drain the mailbox and fan each message out to every
//! registered sink except the sender's.
//!
//! Locking: the subscriber map is only touched under its mutex, and sink
//! writes happen after the snapshot is taken so publishers are never blocked
//! by slow subscribers. The mailbox receiver sits behind an async mutex held
//! from receive through fan-out, which keeps delivery in publish order even
//! with several subscriber loops draining the same room.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use crate::domain::ChatMessage;

/// Output sink for one live subscriber.
pub type SubscriberSink = mpsc::UnboundedSender<ChatMessage>;

/// Errors surfaced by [`RoomHub::publish`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HubError {
    /// The room's mailbox is full. Publish happens inline with an RPC, so
    /// the policy is to reject rather than block.
    #[error("room {chat_id} mailbox is full")]
    Backpressure { chat_id: i64 },

    /// The room was closed while publishing.
    #[error("room {chat_id} is closed")]
    Closed { chat_id: i64 },
}

struct SinkEntry {
    sink: SubscriberSink,
    /// Registration epoch; a later join with the same identity supersedes an
    /// earlier one, and the superseded loop must not unregister its
    /// replacement on the way out.
    epoch: u64,
}

struct Room {
    mailbox_tx: mpsc::Sender<ChatMessage>,
    mailbox_rx: tokio::sync::Mutex<mpsc::Receiver<ChatMessage>>,
    subscribers: parking_lot::Mutex<HashMap<String, SinkEntry>>,
    closed: CancellationToken,
}

/// Per-room registry of live subscribers plus bounded mailboxes.
///
/// Rooms are created on first subscribe or publish and reaped by the
/// explicit chat-deletion hook ([`RoomHub::close`]); idle rooms of existing
/// chats persist.
pub struct RoomHub {
    rooms: DashMap<i64, Arc<Room>>,
    mailbox_capacity: usize,
    epoch: AtomicU64,
}

impl RoomHub {
    pub fn new(mailbox_capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            mailbox_capacity,
            epoch: AtomicU64::new(0),
        }
    }

    fn room(&self, chat_id: i64) -> Arc<Room> {
        self.rooms
            .entry(chat_id)
            .or_insert_with(|| {
                let (mailbox_tx, mailbox_rx) = mpsc::channel(self.mailbox_capacity);
                Arc::new(Room {
                    mailbox_tx,
                    mailbox_rx: tokio::sync::Mutex::new(mailbox_rx),
                    subscribers: parking_lot::Mutex::new(HashMap::new()),
                    closed: CancellationToken::new(),
                })
            })
            .clone()
    }

    /// Enqueue a message onto the room's mailbox without blocking.
    pub fn publish(&self, message: ChatMessage) -> Result<(), HubError> {
        let room = self.room(message.chat_id);
        room.mailbox_tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(m) => HubError::Backpressure { chat_id: m.chat_id },
            TrySendError::Closed(m) => HubError::Closed { chat_id: m.chat_id },
        })
    }

    /// Register `sink` under `subscriber_id` and block draining the room's
    /// mailbox until `cancel` fires or the room is closed.
    ///
    /// A later subscribe with the same identity supersedes the earlier sink.
    /// On return the subscriber is unregistered (unless superseded).
    pub async fn subscribe(
        &self,
        chat_id: i64,
        subscriber_id: &str,
        sink: SubscriberSink,
        cancel: CancellationToken,
    ) {
        let room = self.room(chat_id);
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);

        room.subscribers.lock().insert(
            subscriber_id.to_string(),
            SinkEntry { sink, epoch },
        );
        tracing::debug!(chat_id, subscriber = subscriber_id, "Subscriber registered");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = room.closed.cancelled() => break,
                drained = async {
                    let mut rx = room.mailbox_rx.lock().await;
                    let message = rx.recv().await;
                    // Keep the guard until fan-out is done so concurrent
                    // drainers cannot reorder deliveries.
                    (message, rx)
                } => {
                    let (message, _guard) = drained;
                    match message {
                        Some(message) => Self::fan_out(&room, &message),
                        None => break,
                    }
                }
            }
        }

        let mut subscribers = room.subscribers.lock();
        if subscribers.get(subscriber_id).map(|e| e.epoch) == Some(epoch) {
            subscribers.remove(subscriber_id);
        }
        drop(subscribers);
        tracing::debug!(chat_id, subscriber = subscriber_id, "Subscriber unregistered");
    }

    /// Deliver one message to every registered sink except the sender's.
    /// A broken sink removes that subscriber; the rest still receive.
    fn fan_out(room: &Room, message: &ChatMessage) {
        let targets: Vec<(String, u64, SubscriberSink)> = {
            let subscribers = room.subscribers.lock();
            subscribers
                .iter()
                .filter(|(id, _)| id.as_str() != message.sender)
                .map(|(id, entry)| (id.clone(), entry.epoch, entry.sink.clone()))
                .collect()
        };

        for (id, epoch, sink) in targets {
            if sink.send(message.clone()).is_err() {
                tracing::warn!(
                    chat_id = message.chat_id,
                    subscriber = %id,
                    "Subscriber sink closed, removing"
                );
                let mut subscribers = room.subscribers.lock();
                if subscribers.get(&id).map(|e| e.epoch) == Some(epoch) {
                    subscribers.remove(&id);
                }
            }
        }
    }

    /// Remove the room and wake its subscriber loops. Called from the
    /// chat-deletion path; a closed room's pending messages are dropped.
    pub fn close(&self, chat_id: i64) {
        if let Some((_, room)) = self.rooms.remove(&chat_id) {
            room.closed.cancel();
            tracing::debug!(chat_id, "Room closed");
        }
    }

    /// Number of live subscribers in a room (zero for unknown rooms).
    pub fn subscriber_count(&self, chat_id: i64) -> usize {
        self.rooms
            .get(&chat_id)
            .map(|room| room.subscribers.lock().len())
            .unwrap_or(0)
    }

    /// Number of rooms currently in the registry.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
