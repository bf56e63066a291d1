//! Data Transfer Objects
//!
//! Request and response structures for the HTTP API.

pub mod request;
pub mod response;

pub use request::{CreateChatRequest, SendMessageRequest};
pub use response::{ChatResponse, CreateChatResponse, MessageResponse};
