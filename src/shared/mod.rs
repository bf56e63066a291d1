//! Shared utilities: error taxonomy and deadline-bounded execution.

pub mod deadline;
pub mod error;

pub use deadline::{DeadlineError, DeadlineGuard};
pub use error::AppError;
