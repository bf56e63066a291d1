//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::domain::entities::{Chat, ChatMessage};

/// Created chat response
#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub id: i64,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub id: i64,
    pub usernames: Vec<String>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            usernames: chat.usernames,
        }
    }
}

/// Message payload delivered over a streaming connection
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub chat_id: i64,
    pub sender: String,
    pub text: String,
    pub created_at: String,
}

impl From<&ChatMessage> for MessageResponse {
    fn from(message: &ChatMessage) -> Self {
        Self {
            chat_id: message.chat_id,
            sender: message.sender.clone(),
            text: message.text.clone(),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}
