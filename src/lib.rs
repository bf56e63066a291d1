//! # Chat Relay Library
//!
//! This crate provides a chat relay backend with:
//! - RESTful HTTP API for chat and message management
//! - WebSocket streaming of messages to connected participants
//! - PostgreSQL for persistent storage with a paired audit trail
//! - An external HTTP access-control service gating message sends
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and store traits
//! - **Application Layer**: The dispatcher, its ports, and DTOs
//! - **Infrastructure Layer**: Database, transactions, and the access client
//! - **Presentation Layer**: HTTP handlers, middleware, and the room hub
//!
//! ## Module Structure
//!
//! ```text
//! chat_relay/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and store traits
//! +-- application/   Dispatcher, ports, and DTOs
//! +-- infrastructure/ Database and access-control implementations
//! +-- presentation/  HTTP routes, middleware, streaming hub
//! +-- shared/        Common utilities (errors, deadline guard)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and streaming handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
