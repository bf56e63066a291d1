//! # Domain Entities
//!
//! Core domain entities representing the main business objects.
//! All entities map directly to their corresponding database tables.
//!
//! - **Chat**: A chat room with its participant usernames
//! - **ChatMessage**: An immutable message value, persisted and fanned out
//! - **AuditEntry**: An append-only audit record paired with each mutation
//!
//! Each entity has an associated store trait defining its data access
//! operations. The traits take a transaction-scoped connection and are
//! implemented in the infrastructure layer.

mod audit;
mod chat;
mod message;

pub use audit::{AuditEntry, AuditStore};
pub use chat::{Chat, ChatInfo, ChatStore};
pub use message::{ChatMessage, MessageStore};
