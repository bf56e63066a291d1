//! # Domain Layer
//!
//! Core business entities and their store contracts, independent of any
//! framework or infrastructure concern.
//!
//! - No dependencies on infrastructure or presentation layers
//! - Store traits define data access contracts, implemented in
//!   the infrastructure layer (dependency inversion)

pub mod entities;

pub use entities::*;
