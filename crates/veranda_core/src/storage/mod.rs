//! Expiring key-value cache on top of the SQLite database.
//!
//! # Responsibility
//! - Wrap every stored value in an envelope carrying its write time and
//!   an optional time-to-live, and enforce that deadline on every read.
//! - Keep the cache self-healing: expired or unreadable rows are
//!   dropped or skipped, never surfaced to callers.
//!
//! # Invariants
//! - All keys are namespaced under [`kv_store::NAMESPACE`]; callers use
//!   bare names and never see the prefix.
//! - An entry with a TTL is expired strictly after
//!   `timestamp + expiry * 1000` milliseconds; reads at the deadline
//!   itself still hit. An entry without one never expires.
//! - Read and write paths do not return errors. Failures degrade to a
//!   cache miss (or a dropped write) and are logged.
//!
//! # See also
//! - `crate::db` for the schema these rows live in.
//! - `crate::prefs` for the typed preference API layered on top.

mod envelope;
mod kv_store;

pub use envelope::{Envelope, EnvelopeProbe, Versioned};
pub use kv_store::{KvStore, NAMESPACE};
