//! Domain model for items, tags and notifications.
//!
//! # Responsibility
//! - Define canonical records held by the store.
//! - Define read projections returned to callers.
//!
//! # Invariants
//! - Ids are plain integers drawn from store counters and never reused.
//! - Item/tag cross references are kept consistent by the service layer,
//!   not by these types.

pub mod item;
pub mod notification;
pub mod tag;
