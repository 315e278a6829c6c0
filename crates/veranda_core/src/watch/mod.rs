//! Snapshot-stream primitives used by the entity services.
//!
//! # Responsibility
//! - Multicast the full current entity list to every subscriber on each
//!   mutation ([`SnapshotFeed`]), replaying the latest value to new
//!   subscribers.
//! - Fan out one-shot events with no replay ([`EventFeed`]), backing the
//!   toast channel.
//!
//! # Invariants
//! - Subscribers registered on a [`SnapshotFeed`] are called immediately
//!   with the current value, then once per subsequent publish.
//! - Dropping a [`Subscription`] detaches its listener; no further calls.
//! - Listeners run synchronously on the publishing thread, in registration
//!   order.

mod feed;

pub use feed::{EventFeed, SnapshotFeed, Subscription};
