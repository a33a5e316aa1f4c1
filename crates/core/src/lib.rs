//! `stockcard-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O, no console concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use error::{DomainError, DomainResult};
pub use id::CardId;
pub use value_object::ValueObject;
