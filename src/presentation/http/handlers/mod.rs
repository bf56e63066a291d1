//! HTTP Handlers
//!
//! Request handlers for the REST API endpoints.

pub mod chat;
pub mod health;
