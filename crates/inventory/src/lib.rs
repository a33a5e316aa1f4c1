//! Inventory card domain module.
//!
//! This crate contains the business rules for product cards and the in-memory
//! registry that owns them, implemented purely as deterministic domain logic
//! (no console, no storage). Interactive input reaches the domain only through
//! the [`WriteOffConfirmation`] port.

pub mod card;
pub mod confirmation;
pub mod registry;
pub mod snapshot;

pub use card::{Card, CardFields, CardPatch, CardStatus, RECEIPT_DATE_FORMAT};
pub use confirmation::{Confirm, WriteOffConfirmation, WriteOffRequest};
pub use registry::{CardListLine, CardListing, Registry, EMPTY_LISTING_MESSAGE};
pub use snapshot::{CardSnapshot, DisplaySettings};
