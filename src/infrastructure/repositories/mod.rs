//! # Repository Implementations
//!
//! PostgreSQL implementations of the domain store traits. Every method runs
//! on a transaction-scoped connection handed in by the transaction manager,
//! so any group of store calls can share one atomic transaction.

mod audit_repository;
mod chat_repository;
mod message_repository;

pub use audit_repository::PgAuditStore;
pub use chat_repository::PgChatStore;
pub use message_repository::PgMessageStore;
