//! Derived dashboard aggregate.
//!
//! # Responsibility
//! - Mirror the booking and space lists through their snapshot streams
//!   and republish recomputed stats after every upstream tick.
//!
//! # Invariants
//! - Stats are recomputed from scratch per tick; nothing is aggregated
//!   incrementally.
//! - The service holds plain copies of the upstream lists, never the
//!   upstream feeds themselves.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::latency::Latency;
use crate::model::booking::{Booking, BookingStatus};
use crate::model::space::{Space, SpaceId};
use crate::model::stats::{DashboardStats, RECENT_BOOKINGS_LIMIT};
use crate::service::booking::BookingService;
use crate::service::space::SpaceService;
use crate::watch::{SnapshotFeed, Subscription};

/// Stats publisher fed by the booking and space snapshot streams.
pub struct DashboardService {
    feed: SnapshotFeed<DashboardStats>,
    bookings: Arc<RwLock<Vec<Booking>>>,
    spaces: Arc<RwLock<Vec<Space>>>,
    latency: Latency,
    _booking_sub: Subscription,
    _space_sub: Subscription,
}

impl DashboardService {
    /// Wires the service into both upstream streams. The replay each
    /// subscription triggers fills the mirrors, so stats are correct as
    /// soon as construction returns.
    pub fn new(
        booking_service: &BookingService,
        space_service: &SpaceService,
        latency: Latency,
    ) -> Self {
        let bookings: Arc<RwLock<Vec<Booking>>> = Arc::new(RwLock::new(Vec::new()));
        let spaces: Arc<RwLock<Vec<Space>>> = Arc::new(RwLock::new(Vec::new()));
        let feed = SnapshotFeed::new(DashboardStats::default());

        let booking_mirror = Arc::clone(&bookings);
        let spaces_of_booking_tick = Arc::clone(&spaces);
        let booking_feed = feed.clone();
        let _booking_sub = booking_service.subscribe(move |list| {
            *booking_mirror
                .write()
                .unwrap_or_else(PoisonError::into_inner) = list.to_vec();
            let total_spaces = spaces_of_booking_tick
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len();
            booking_feed.set(compute_stats(list, total_spaces));
        });

        let space_mirror = Arc::clone(&spaces);
        let bookings_of_space_tick = Arc::clone(&bookings);
        let space_feed = feed.clone();
        let _space_sub = space_service.subscribe(move |list| {
            *space_mirror
                .write()
                .unwrap_or_else(PoisonError::into_inner) = list.to_vec();
            let bookings = bookings_of_space_tick
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            space_feed.set(compute_stats(&bookings, list.len()));
        });

        Self {
            feed,
            bookings,
            spaces,
            latency,
            _booking_sub,
            _space_sub,
        }
    }

    /// Latest published stats.
    pub fn stats(&self) -> DashboardStats {
        self.latency.pause();
        self.feed.get()
    }

    /// Recomputes from the current mirrors and publishes the result.
    pub fn recompute(&self) -> DashboardStats {
        self.latency.pause();
        let stats = {
            let bookings = self.bookings.read().unwrap_or_else(PoisonError::into_inner);
            let spaces = self.spaces.read().unwrap_or_else(PoisonError::into_inner);
            compute_stats(&bookings, spaces.len())
        };
        self.feed.set(stats.clone());
        stats
    }

    /// Registers a stats listener; the latest value is replayed to it
    /// immediately.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&DashboardStats) + Send + Sync + 'static,
    ) -> Subscription {
        self.feed.subscribe(listener)
    }
}

/// Full recomputation over one booking list.
///
/// Occupancy counts each space at most once, held by any pending or
/// confirmed booking, as a percentage of `total_spaces`. Revenue sums
/// `total_price` over non-cancelled bookings. Recent bookings are newest
/// first by creation time, capped at [`RECENT_BOOKINGS_LIMIT`].
fn compute_stats(bookings: &[Booking], total_spaces: usize) -> DashboardStats {
    let mut stats = DashboardStats {
        total_bookings: bookings.len(),
        ..DashboardStats::default()
    };
    let mut occupied: HashSet<SpaceId> = HashSet::new();
    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => {
                stats.pending_bookings += 1;
                occupied.insert(booking.space_id);
            }
            BookingStatus::Confirmed => {
                stats.confirmed_bookings += 1;
                occupied.insert(booking.space_id);
            }
            BookingStatus::Cancelled => stats.cancelled_bookings += 1,
            BookingStatus::Completed => stats.completed_bookings += 1,
        }
        if booking.status != BookingStatus::Cancelled {
            stats.total_revenue += booking.total_price;
        }
    }
    stats.occupancy_rate = if total_spaces == 0 {
        0.0
    } else {
        occupied.len() as f64 / total_spaces as f64 * 100.0
    };
    let mut recent = bookings.to_vec();
    recent.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
    recent.truncate(RECENT_BOOKINGS_LIMIT);
    stats.recent_bookings = recent;
    stats
}
