//! Live delivery: the room hub and the WebSocket join handler.

pub mod handler;
pub mod hub;

pub use handler::connect_chat;
pub use hub::{HubError, RoomHub, SubscriberSink};
