//! Entity services publishing replay-latest snapshots.
//!
//! # Responsibility
//! - Own the canonical in-memory lists (bookings, spaces, notifications)
//!   and the derived dashboard aggregate.
//! - Publish a fresh snapshot of the whole list after every accepted
//!   mutation.
//!
//! # Invariants
//! - Mutations are copy-on-write: clone the record, modify the clone,
//!   replace the list slot, publish.
//! - A mutation that finds no target returns `None` (or `false`) and
//!   publishes nothing.
//! - Snapshot listeners may query services but must not call back into
//!   mutations; deliveries run synchronously on the mutating thread.
//!
//! # See also
//! - `crate::watch` for the snapshot feed primitive.

pub mod booking;
pub mod dashboard;
pub mod notification;
pub mod space;
