use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::Clock;

use super::envelope::{expires_at_ms, Envelope, EnvelopeProbe, EnvelopeRef, Versioned};

/// Prefix applied to every key before it touches the database, keeping
/// cache rows recognisable and `clear` scoped to this crate's data.
pub const NAMESPACE: &str = "veranda.";

/// Expiring key-value cache. All methods take `&self`; the connection
/// sits behind a mutex so the store can be shared across threads.
///
/// Read and write failures never escape: they are logged and collapse
/// into a miss (reads) or a dropped write (writes).
pub struct KvStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl KvStore {
    /// Wraps an already-migrated connection and sweeps out any rows
    /// that expired while the store was offline.
    pub fn new(conn: Connection, clock: Arc<dyn Clock>) -> Self {
        let store = KvStore {
            conn: Mutex::new(conn),
            clock,
        };
        let evicted = store.evict_expired();
        log::info!("event=kv_open module=storage evicted={evicted}");
        store
    }

    /// Stores `value` under `key` with no expiry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.write(key, value, None);
    }

    /// Stores `value` under `key`, expiring `ttl_secs` seconds from now.
    pub fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl_secs: i64) {
        self.write(key, value, Some(ttl_secs));
    }

    fn write<T: Serialize>(&self, key: &str, value: &T, ttl_secs: Option<i64>) {
        let now = self.clock.now_ms();
        let envelope = EnvelopeRef {
            value,
            timestamp: now,
            expiry: ttl_secs,
        };
        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("event=kv_set_failed module=storage key={key} reason=serialize err={e}");
                return;
            }
        };
        let expires_at = ttl_secs.map(|secs| expires_at_ms(now, secs));
        if let Err(first) = self.insert_row(key, &json, expires_at) {
            // One retry after sweeping expired rows.
            self.evict_expired();
            if let Err(e) = self.insert_row(key, &json, expires_at) {
                log::warn!(
                    "event=kv_set_failed module=storage key={key} reason=db first_err={first} err={e}"
                );
            }
        }
    }

    /// Reads `key`, returning `None` on a miss, an expired entry, or an
    /// envelope that no longer decodes. Expired entries are deleted on
    /// the spot.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let qualified = qualify(key);
        let json = self.load_row(&qualified)?;
        let probe: EnvelopeProbe = match serde_json::from_str(&json) {
            Ok(probe) => probe,
            Err(e) => {
                log::warn!("event=kv_corrupt module=storage key={key} err={e}");
                return None;
            }
        };
        if probe.is_expired(self.clock.now_ms()) {
            self.delete_row(&qualified);
            log::debug!("event=kv_expired module=storage key={key}");
            return None;
        }
        match serde_json::from_str::<Envelope<T>>(&json) {
            Ok(envelope) => Some(envelope.value),
            Err(e) => {
                log::warn!("event=kv_corrupt module=storage key={key} err={e}");
                None
            }
        }
    }

    /// Like [`KvStore::get`], but falls back to `default` on a miss.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Deletes `key` if present.
    pub fn remove(&self, key: &str) {
        self.delete_row(&qualify(key));
    }

    /// True if `key` holds a live, readable entry. An expired entry is
    /// deleted and reported as absent.
    pub fn has(&self, key: &str) -> bool {
        let qualified = qualify(key);
        let Some(json) = self.load_row(&qualified) else {
            return false;
        };
        match serde_json::from_str::<EnvelopeProbe>(&json) {
            Ok(probe) if probe.is_expired(self.clock.now_ms()) => {
                self.delete_row(&qualified);
                false
            }
            Ok(_) => true,
            Err(e) => {
                log::warn!("event=kv_corrupt module=storage key={key} err={e}");
                false
            }
        }
    }

    /// Removes every entry in this store's namespace.
    pub fn clear(&self) {
        let result = self.conn().execute(
            "DELETE FROM kv_entries WHERE key LIKE ?1",
            params![format!("{NAMESPACE}%")],
        );
        if let Err(e) = result {
            log::warn!("event=kv_clear_failed module=storage err={e}");
        }
    }

    /// Bare names of all live entries, sorted, namespace stripped.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        let conn = self.conn();
        let mut stmt = match conn.prepare(
            "SELECT key FROM kv_entries
             WHERE key LIKE ?1 AND (expires_at_ms IS NULL OR expires_at_ms >= ?2)
             ORDER BY key",
        ) {
            Ok(stmt) => stmt,
            Err(e) => {
                log::warn!("event=kv_keys_failed module=storage err={e}");
                return Vec::new();
            }
        };
        let rows = stmt.query_map(params![format!("{NAMESPACE}%"), now], |row| {
            row.get::<_, String>(0)
        });
        match rows {
            Ok(rows) => rows
                .filter_map(Result::ok)
                .map(|key| key[NAMESPACE.len()..].to_string())
                .collect(),
            Err(e) => {
                log::warn!("event=kv_keys_failed module=storage err={e}");
                Vec::new()
            }
        }
    }

    /// Stores several entries, none of them expiring.
    pub fn set_multiple<T: Serialize>(&self, entries: &[(&str, T)]) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Reads several keys at once. Every requested key appears in the
    /// result, misses as `None`.
    pub fn get_multiple<T: DeserializeOwned>(&self, keys: &[&str]) -> BTreeMap<String, Option<T>> {
        keys.iter()
            .map(|key| ((*key).to_string(), self.get(key)))
            .collect()
    }

    /// Stores `value` tagged with a layout `version`, with no expiry.
    pub fn set_with_version<T: Serialize>(&self, key: &str, value: &T, version: u32) {
        self.set(
            key,
            &Versioned {
                version,
                data: value,
            },
        );
    }

    /// Stores `value` tagged with a layout `version`, expiring `ttl_secs`
    /// seconds from now.
    pub fn set_with_version_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        version: u32,
        ttl_secs: i64,
    ) {
        self.set_with_ttl(
            key,
            &Versioned {
                version,
                data: value,
            },
            ttl_secs,
        );
    }

    /// Reads a versioned entry. A version mismatch, or a payload that no
    /// longer decodes as `T`, deletes the entry and reads as a miss.
    pub fn get_with_version<T: DeserializeOwned>(&self, key: &str, version: u32) -> Option<T> {
        let stored: Versioned<serde_json::Value> = self.get(key)?;
        if stored.version != version {
            log::info!(
                "event=kv_version_mismatch module=storage key={key} found={} expected={version}",
                stored.version
            );
            self.remove(key);
            return None;
        }
        match serde_json::from_value(stored.data) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("event=kv_corrupt module=storage key={key} err={e}");
                self.remove(key);
                None
            }
        }
    }

    /// Deletes every row whose deadline has passed. Returns how many
    /// rows went away.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now_ms();
        match self.conn().execute(
            "DELETE FROM kv_entries WHERE expires_at_ms IS NOT NULL AND expires_at_ms < ?1",
            params![now],
        ) {
            Ok(evicted) => evicted,
            Err(e) => {
                log::warn!("event=kv_sweep_failed module=storage err={e}");
                0
            }
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_row(&self, key: &str, envelope: &str, expires_at: Option<i64>) -> rusqlite::Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO kv_entries (key, envelope, expires_at_ms) VALUES (?1, ?2, ?3)",
            params![qualify(key), envelope, expires_at],
        )?;
        Ok(())
    }

    fn load_row(&self, qualified: &str) -> Option<String> {
        let result = self
            .conn()
            .query_row(
                "SELECT envelope FROM kv_entries WHERE key = ?1",
                params![qualified],
                |row| row.get(0),
            )
            .optional();
        match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("event=kv_get_failed module=storage key={qualified} err={e}");
                None
            }
        }
    }

    fn delete_row(&self, qualified: &str) {
        let result = self
            .conn()
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![qualified]);
        if let Err(e) = result {
            log::warn!("event=kv_remove_failed module=storage key={qualified} err={e}");
        }
    }
}

fn qualify(key: &str) -> String {
    format!("{NAMESPACE}{key}")
}
