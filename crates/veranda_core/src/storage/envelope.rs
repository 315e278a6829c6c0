use serde::{Deserialize, Serialize};

/// JSON wrapper persisted for every cache entry.
///
/// `timestamp` is the write time in epoch milliseconds, `expiry` the
/// time-to-live in seconds. An entry with no `expiry` never expires.
/// Field names are part of the stored format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

/// Borrowing counterpart of [`Envelope`] used on the write path, so a
/// value can be serialised without cloning it into a wrapper first.
#[derive(Serialize)]
pub(crate) struct EnvelopeRef<'a, T: Serialize> {
    pub value: &'a T,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

/// Partial decode of an envelope: just the bookkeeping fields, leaving
/// `value` untouched. Enough to answer expiry questions without decoding
/// the payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EnvelopeProbe {
    pub timestamp: i64,
    pub expiry: Option<i64>,
}

impl EnvelopeProbe {
    /// True once `now_ms` is strictly past the entry's deadline. Entries
    /// with no TTL never expire.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expiry
            .is_some_and(|secs| now_ms.saturating_sub(self.timestamp) > secs.saturating_mul(1000))
    }

    /// Absolute deadline in epoch milliseconds, `None` for entries that
    /// never expire.
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.expiry.map(|secs| expires_at_ms(self.timestamp, secs))
    }
}

/// Deadline for an entry written at `timestamp_ms` with a TTL of
/// `expiry_secs` seconds.
pub(crate) fn expires_at_ms(timestamp_ms: i64, expiry_secs: i64) -> i64 {
    timestamp_ms.saturating_add(expiry_secs.saturating_mul(1000))
}

/// Payload wrapper for entries whose layout may change across releases.
/// A version mismatch on read is treated as stale data, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u32,
    pub data: T,
}
