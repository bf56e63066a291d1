//! Presentation Layer
//!
//! HTTP routes, middleware, and the streaming message hub.

pub mod http;
pub mod middleware;
pub mod stream;
