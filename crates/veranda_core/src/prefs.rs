//! Visitor preferences persisted through the expiring cache.
//!
//! # Responsibility
//! - Give the frontend typed accessors for favorites, recently viewed
//!   spaces, form drafts, display preferences and one-shot flags.
//!
//! # Invariants
//! - Favorites and history keep at most one entry per space.
//! - The view history is newest first and capped at
//!   [`VIEW_HISTORY_LIMIT`] entries.
//! - Form drafts expire on their own; everything else never expires.
//!
//! # See also
//! - `crate::storage` for the cache these keys live in.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::model::space::SpaceId;
use crate::storage::KvStore;

/// Cap on the recently-viewed list.
pub const VIEW_HISTORY_LIMIT: usize = 20;

const DRAFT_TTL_SECS: i64 = 3_600;

const FAVORITES_KEY: &str = "favorites";
const VIEW_HISTORY_KEY: &str = "viewed_spaces";
const PREFERENCES_KEY: &str = "preferences";
const WELCOME_KEY: &str = "welcome_shown";

fn draft_key(form_id: &str) -> String {
    format!("draft.{form_id}")
}

/// One recently-viewed catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewedEntry {
    pub space_id: SpaceId,
    /// When the space was last opened, epoch milliseconds.
    pub viewed_at_ms: i64,
}

/// Typed preference API over the shared cache.
pub struct PrefsStore {
    kv: Arc<KvStore>,
    clock: Arc<dyn Clock>,
}

impl PrefsStore {
    pub fn new(kv: Arc<KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Favorited space ids, insertion order.
    pub fn favorites(&self) -> Vec<SpaceId> {
        self.kv.get_or(FAVORITES_KEY, Vec::new())
    }

    /// True when `id` is currently favorited.
    pub fn is_favorite(&self, id: SpaceId) -> bool {
        self.favorites().contains(&id)
    }

    /// Adds a favorite. Returns false when it was already present.
    pub fn add_favorite(&self, id: SpaceId) -> bool {
        let mut favorites = self.favorites();
        if favorites.contains(&id) {
            return false;
        }
        favorites.push(id);
        self.kv.set(FAVORITES_KEY, &favorites);
        true
    }

    /// Removes a favorite. Returns false when it was not present.
    pub fn remove_favorite(&self, id: SpaceId) -> bool {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|f| *f != id);
        if favorites.len() == before {
            return false;
        }
        self.kv.set(FAVORITES_KEY, &favorites);
        true
    }

    /// Flips the favorite state of `id` and returns the new state.
    pub fn toggle_favorite(&self, id: SpaceId) -> bool {
        if self.remove_favorite(id) {
            false
        } else {
            self.add_favorite(id);
            true
        }
    }

    /// Records that `id` was just viewed. An existing entry for the same
    /// space moves to the front with a fresh timestamp.
    pub fn record_view(&self, id: SpaceId) {
        let mut history = self.view_history();
        history.retain(|entry| entry.space_id != id);
        history.insert(
            0,
            ViewedEntry {
                space_id: id,
                viewed_at_ms: self.clock.now_ms(),
            },
        );
        history.truncate(VIEW_HISTORY_LIMIT);
        self.kv.set(VIEW_HISTORY_KEY, &history);
    }

    /// Recently viewed spaces, newest first.
    pub fn view_history(&self) -> Vec<ViewedEntry> {
        self.kv.get_or(VIEW_HISTORY_KEY, Vec::new())
    }

    /// Saves the field values of a half-finished form.
    pub fn save_draft(&self, form_id: &str, fields: &BTreeMap<String, String>) {
        self.kv
            .set_with_ttl(&draft_key(form_id), fields, DRAFT_TTL_SECS);
    }

    /// Restores a saved form draft, if one is still live.
    pub fn load_draft(&self, form_id: &str) -> Option<BTreeMap<String, String>> {
        self.kv.get(&draft_key(form_id))
    }

    /// Drops a saved form draft.
    pub fn discard_draft(&self, form_id: &str) {
        self.kv.remove(&draft_key(form_id));
    }

    /// Stores the caller-defined display preferences blob.
    pub fn set_preferences<T: Serialize>(&self, preferences: &T) {
        self.kv.set(PREFERENCES_KEY, preferences);
    }

    /// Reads the display preferences blob back, if present and live.
    pub fn preferences<T: DeserializeOwned>(&self) -> Option<T> {
        self.kv.get(PREFERENCES_KEY)
    }

    /// Remembers that the welcome tour was shown.
    pub fn set_welcome_shown(&self) {
        self.kv.set(WELCOME_KEY, &true);
    }

    /// True once the welcome tour has been shown.
    pub fn welcome_shown(&self) -> bool {
        self.kv.get_or(WELCOME_KEY, false)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::clock::ManualClock;
    use crate::db::open_db_in_memory;
    use crate::storage::KvStore;

    use super::{PrefsStore, VIEW_HISTORY_LIMIT};

    fn prefs() -> (PrefsStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_at(1_000));
        let kv = Arc::new(KvStore::new(open_db_in_memory().unwrap(), clock.clone()));
        (PrefsStore::new(kv, clock.clone()), clock)
    }

    #[test]
    fn favorites_toggle_roundtrip() {
        let (prefs, _clock) = prefs();
        let id = Uuid::new_v4();
        assert!(!prefs.is_favorite(id));
        assert!(prefs.toggle_favorite(id));
        assert!(prefs.is_favorite(id));
        assert!(!prefs.toggle_favorite(id));
        assert!(!prefs.is_favorite(id));
    }

    #[test]
    fn add_favorite_is_idempotent() {
        let (prefs, _clock) = prefs();
        let id = Uuid::new_v4();
        assert!(prefs.add_favorite(id));
        assert!(!prefs.add_favorite(id));
        assert_eq!(prefs.favorites(), vec![id]);
    }

    #[test]
    fn favorites_outlive_any_clock_jump() {
        let (prefs, clock) = prefs();
        let id = Uuid::new_v4();
        prefs.add_favorite(id);
        clock.advance_ms(10 * 365 * 86_400_000);
        assert!(prefs.is_favorite(id));
    }

    #[test]
    fn view_history_dedupes_and_moves_to_front() {
        let (prefs, clock) = prefs();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        prefs.record_view(first);
        clock.advance_ms(10);
        prefs.record_view(second);
        clock.advance_ms(10);
        prefs.record_view(first);

        let history = prefs.view_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].space_id, first);
        assert_eq!(history[0].viewed_at_ms, 1_020);
        assert_eq!(history[1].space_id, second);
    }

    #[test]
    fn view_history_is_capped() {
        let (prefs, _clock) = prefs();
        for _ in 0..(VIEW_HISTORY_LIMIT + 5) {
            prefs.record_view(Uuid::new_v4());
        }
        assert_eq!(prefs.view_history().len(), VIEW_HISTORY_LIMIT);
    }

    #[test]
    fn drafts_roundtrip_and_expire() {
        let (prefs, clock) = prefs();
        let mut fields = BTreeMap::new();
        fields.insert("guest_name".to_string(), "Ada".to_string());
        fields.insert("adults".to_string(), "2".to_string());
        prefs.save_draft("booking_form", &fields);
        assert_eq!(prefs.load_draft("booking_form"), Some(fields));

        clock.advance_ms(3_600_000 + 1);
        assert_eq!(prefs.load_draft("booking_form"), None);
    }

    #[test]
    fn discarded_draft_is_gone() {
        let (prefs, _clock) = prefs();
        let mut fields = BTreeMap::new();
        fields.insert("note".to_string(), "hi".to_string());
        prefs.save_draft("contact", &fields);
        prefs.discard_draft("contact");
        assert_eq!(prefs.load_draft("contact"), None);
    }

    #[test]
    fn welcome_flag_defaults_to_false() {
        let (prefs, _clock) = prefs();
        assert!(!prefs.welcome_shown());
        prefs.set_welcome_shown();
        assert!(prefs.welcome_shown());
    }
}
