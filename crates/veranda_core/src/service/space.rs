//! Space catalog service.
//!
//! # Responsibility
//! - Own the catalog list, publish it as a snapshot stream and keep the
//!   expiring cache entry in step with it.
//! - Answer category, capacity, price and free-text catalog queries.
//!
//! # Invariants
//! - On construction the catalog comes from the cache when a live,
//!   version-matching entry exists, otherwise from the seed fixtures.
//! - Every accepted mutation rewrites the cache entry before returning.

use std::sync::Arc;

use uuid::Uuid;

use crate::fixtures;
use crate::latency::Latency;
use crate::model::space::{Space, SpaceCategory, SpaceDraft, SpaceId, SpaceUpdate};
use crate::storage::KvStore;
use crate::watch::{SnapshotFeed, Subscription};

/// Cache key holding the serialized catalog.
pub const SPACES_CACHE_KEY: &str = "spaces";

/// Layout version of the cached catalog entry. Bump when [`Space`]
/// changes shape; stale entries then read as misses and reseed.
pub const SPACES_CACHE_VERSION: u32 = 1;

/// How long a primed catalog entry stays live.
pub const SPACES_CACHE_TTL_SECS: i64 = 3600;

/// Conjunctive catalog filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceFilter {
    pub category: Option<SpaceCategory>,
    pub min_capacity: Option<u32>,
    /// Upper bound on the nightly price. Spaces without a price never
    /// match when this is set.
    pub max_price: Option<f64>,
    pub available_only: bool,
    /// Case-insensitive substring over name, description and features.
    pub text: Option<String>,
}

impl SpaceFilter {
    fn matches(&self, space: &Space) -> bool {
        if let Some(category) = self.category {
            if space.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_capacity {
            if !space.capacity.is_some_and(|c| c >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !space.price.is_some_and(|p| p <= max) {
                return false;
            }
        }
        if self.available_only && !space.available {
            return false;
        }
        if let Some(text) = &self.text {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty() && !haystack(space).contains(&needle) {
                return false;
            }
        }
        true
    }
}

fn haystack(space: &Space) -> String {
    let mut s = String::new();
    s.push_str(&space.name.to_lowercase());
    s.push(' ');
    s.push_str(&space.description.to_lowercase());
    for feature in &space.features {
        s.push(' ');
        s.push_str(&feature.to_lowercase());
    }
    s
}

/// Catalog owner backed by the expiring cache.
pub struct SpaceService {
    feed: SnapshotFeed<Vec<Space>>,
    cache: Arc<KvStore>,
    latency: Latency,
}

impl SpaceService {
    /// Builds the catalog from the cache when possible, seeding and
    /// priming the cache from fixtures otherwise.
    pub fn new(cache: Arc<KvStore>, latency: Latency) -> Self {
        let cached: Option<Vec<Space>> =
            cache.get_with_version(SPACES_CACHE_KEY, SPACES_CACHE_VERSION);
        let from_cache = cached.is_some();
        let spaces = cached.unwrap_or_else(fixtures::seed_spaces);
        log::info!(
            "event=space_seed module=service source={} count={}",
            if from_cache { "cache" } else { "fixtures" },
            spaces.len()
        );
        let service = Self {
            feed: SnapshotFeed::new(spaces),
            cache,
            latency,
        };
        if !from_cache {
            service.prime_cache();
        }
        service
    }

    /// Snapshot of the whole catalog.
    pub fn spaces(&self) -> Vec<Space> {
        self.latency.pause();
        self.feed.get()
    }

    /// Looks up one space by id.
    pub fn space(&self, id: SpaceId) -> Option<Space> {
        self.latency.pause();
        self.feed
            .read(|list| list.iter().find(|s| s.id == id).cloned())
    }

    /// All spaces in one category, catalog order.
    pub fn by_category(&self, category: SpaceCategory) -> Vec<Space> {
        self.latency.pause();
        self.feed.read(|list| {
            list.iter()
                .filter(|s| s.category == category)
                .cloned()
                .collect()
        })
    }

    /// Catalog entries matching every set field of `filter`.
    pub fn search(&self, filter: &SpaceFilter) -> Vec<Space> {
        self.latency.pause();
        self.feed.read(|list| {
            list.iter()
                .filter(|s| filter.matches(s))
                .cloned()
                .collect()
        })
    }

    /// Adds a new space to the catalog.
    ///
    /// # Contract
    /// - The service assigns the id; everything else comes from the draft.
    /// - The new entry is appended, published and written to the cache.
    pub fn create(&self, draft: SpaceDraft) -> Space {
        self.latency.pause();
        let space = Space {
            id: Uuid::new_v4(),
            name: draft.name,
            category: draft.category,
            description: draft.description,
            images: draft.images,
            features: draft.features,
            capacity: draft.capacity,
            price: draft.price,
            currency: draft.currency,
            available: draft.available,
            details: draft.details,
        };
        let published = space.clone();
        self.feed.update(move |list| list.push(published));
        self.prime_cache();
        log::info!(
            "event=space_created module=service id={} category={:?}",
            space.id,
            space.category
        );
        space
    }

    /// Applies a field-wise patch to one space.
    pub fn update(&self, id: SpaceId, update: &SpaceUpdate) -> Option<Space> {
        self.latency.pause();
        let updated = self.mutate(id, |space| space.patched(update));
        if updated.is_some() {
            log::info!("event=space_updated module=service id={id}");
        }
        updated
    }

    /// Flips the availability flag of one space.
    pub fn set_availability(&self, id: SpaceId, available: bool) -> Option<Space> {
        self.latency.pause();
        let updated = self.mutate(id, |space| {
            let mut next = space.clone();
            next.available = available;
            next
        });
        if updated.is_some() {
            log::info!("event=space_availability module=service id={id} available={available}");
        }
        updated
    }

    /// Discards the current catalog, reloads the seed fixtures, publishes
    /// and re-primes the cache. Returns the fresh list.
    pub fn refresh(&self) -> Vec<Space> {
        self.latency.pause();
        let spaces = fixtures::seed_spaces();
        self.feed.set(spaces.clone());
        self.prime_cache();
        log::info!("event=space_refresh module=service count={}", spaces.len());
        spaces
    }

    /// Registers a snapshot listener; the current catalog is replayed to
    /// it immediately.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&[Space]) + Send + Sync + 'static) -> Subscription {
        self.feed.subscribe(move |list| listener(list))
    }

    fn mutate(&self, id: SpaceId, apply: impl FnOnce(&Space) -> Space) -> Option<Space> {
        if !self.feed.read(|list| list.iter().any(|s| s.id == id)) {
            return None;
        }
        let mut updated: Option<Space> = None;
        self.feed.update(|list| {
            if let Some(slot) = list.iter_mut().find(|s| s.id == id) {
                let next = apply(slot);
                *slot = next.clone();
                updated = Some(next);
            }
        });
        if updated.is_some() {
            self.prime_cache();
        }
        updated
    }

    fn prime_cache(&self) {
        self.feed.read(|spaces| {
            self.cache.set_with_version_ttl(
                SPACES_CACHE_KEY,
                spaces,
                SPACES_CACHE_VERSION,
                SPACES_CACHE_TTL_SECS,
            );
        });
    }
}
