//! Middleware
//!
//! Tower middleware for request processing.

pub mod admission;
pub mod cors;
pub mod deadline;
pub mod logging;

pub use admission::{admission_middleware, AdmissionGate};
pub use deadline::{deadline_middleware, RequestCancellation};
