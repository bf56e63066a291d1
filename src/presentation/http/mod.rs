//! HTTP Surface
//!
//! Route configuration and request handlers for the REST API.

pub mod handlers;
pub mod routes;

pub use routes::create_router;
