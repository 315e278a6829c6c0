//! Domain model for the booking data layer.
//!
//! # Responsibility
//! - Define the canonical entities owned by the entity services.
//! - Keep identifier aliases and status vocabulary in one place.
//!
//! # Invariants
//! - Every entity carries a stable uuid-based id that is never reused.
//! - Entities are replaced wholesale when a service publishes a new
//!   snapshot; fields of a published list are never mutated in place.

pub mod booking;
pub mod notification;
pub mod space;
pub mod stats;
