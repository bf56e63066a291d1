//! # Infrastructure Layer
//!
//! External implementations: database pool and transactions, Postgres store
//! implementations, the transactional persistence facade, and the HTTP
//! access-control client.

pub mod access;
pub mod database;
pub mod persistence;
pub mod repositories;

pub use access::HttpAccessClient;
pub use persistence::PgChatPersistence;
