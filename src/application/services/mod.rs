//! Application Services
//!
//! Business workflows composed from domain stores and external ports.

pub mod chat_service;

pub use chat_service::ChatService;
