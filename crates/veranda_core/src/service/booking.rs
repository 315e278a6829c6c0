//! Booking use-case service.
//!
//! # Responsibility
//! - Own the canonical booking list and publish it as a snapshot stream.
//! - Generate confirmation codes and run draft validation on creation.
//!
//! # Invariants
//! - Confirmation codes are unique within the list and never reissued to
//!   a different booking.
//! - `cancel` is idempotent: cancelling a cancelled booking returns it
//!   unchanged and publishes nothing.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use uuid::Uuid;

use crate::clock::Clock;
use crate::fixtures;
use crate::latency::Latency;
use crate::model::booking::{
    Booking, BookingDraft, BookingId, BookingStatus, BookingValidationError, PaymentStatus,
};
use crate::model::space::SpaceId;
use crate::watch::{SnapshotFeed, Subscription};

/// Leading letters of every confirmation code.
pub const CONFIRMATION_PREFIX: &str = "VRD";

/// How many random draws to try before widening the code space.
const CODE_ATTEMPTS: u32 = 16;

static CONFIRMATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^VRD\d{5,}$").expect("valid confirmation code regex"));

/// Booking list owner. Queries read the latest snapshot; mutations
/// replace one record and publish the whole list to subscribers.
pub struct BookingService {
    feed: SnapshotFeed<Vec<Booking>>,
    clock: Arc<dyn Clock>,
    latency: Latency,
}

impl BookingService {
    /// Creates a service seeded with the stock booking fixtures.
    pub fn new(clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self::with_seed(fixtures::seed_bookings(), clock, latency)
    }

    /// Creates a service seeded with an explicit starting list.
    pub fn with_seed(bookings: Vec<Booking>, clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self {
            feed: SnapshotFeed::new(bookings),
            clock,
            latency,
        }
    }

    /// Snapshot of all bookings.
    pub fn bookings(&self) -> Vec<Booking> {
        self.latency.pause();
        self.feed.get()
    }

    /// Looks up one booking by id.
    pub fn booking(&self, id: BookingId) -> Option<Booking> {
        self.latency.pause();
        self.feed
            .read(|list| list.iter().find(|b| b.id == id).cloned())
    }

    /// Looks up a booking by confirmation code.
    ///
    /// # Contract
    /// - Input is normalised (trimmed, uppercased) before matching.
    /// - Anything that does not look like a code at all is rejected
    ///   without touching the list.
    pub fn find_by_confirmation_code(&self, code: &str) -> Option<Booking> {
        self.latency.pause();
        let normalized = code.trim().to_uppercase();
        if !CONFIRMATION_RE.is_match(&normalized) {
            log::debug!("event=booking_code_rejected module=service code={code:?}");
            return None;
        }
        self.feed
            .read(|list| list.iter().find(|b| b.confirmation_code == normalized).cloned())
    }

    /// All bookings made under a guest email, case-insensitively.
    pub fn bookings_for_guest(&self, email: &str) -> Vec<Booking> {
        self.latency.pause();
        let needle = email.trim().to_lowercase();
        self.feed.read(|list| {
            list.iter()
                .filter(|b| b.guest_email.to_lowercase() == needle)
                .cloned()
                .collect()
        })
    }

    /// All bookings against one space, any lifecycle state.
    pub fn bookings_for_space(&self, space_id: SpaceId) -> Vec<Booking> {
        self.latency.pause();
        self.feed.read(|list| {
            list.iter()
                .filter(|b| b.space_id == space_id)
                .cloned()
                .collect()
        })
    }

    /// True when a non-cancelled booking for `space_id` overlaps the
    /// half-open range `[check_in_ms, check_out_ms)`.
    pub fn has_conflict(&self, space_id: SpaceId, check_in_ms: i64, check_out_ms: i64) -> bool {
        self.latency.pause();
        self.feed.read(|list| {
            list.iter()
                .filter(|b| b.space_id == space_id && b.status != BookingStatus::Cancelled)
                .any(|b| b.overlaps(check_in_ms, check_out_ms))
        })
    }

    /// Accepts a draft and appends the new booking.
    ///
    /// # Contract
    /// - Draft invariants are checked first; a rejected draft changes
    ///   nothing and publishes nothing.
    /// - The new booking starts `Pending`/`Unpaid` with a fresh id and a
    ///   unique confirmation code.
    /// - A date conflict on the target space is logged, not rejected;
    ///   callers probe [`BookingService::has_conflict`] up front.
    pub fn create(&self, draft: &BookingDraft) -> Result<Booking, BookingValidationError> {
        self.latency.pause();
        draft.validate()?;

        if self.has_conflict_unpaused(draft.space_id, draft.check_in_ms, draft.check_out_ms) {
            log::warn!(
                "event=booking_conflict module=service space_id={} check_in_ms={} check_out_ms={}",
                draft.space_id,
                draft.check_in_ms,
                draft.check_out_ms
            );
        }

        let confirmation_code = self.feed.read(|list| unique_code(list));
        let booking = Booking {
            id: Uuid::new_v4(),
            guest_name: draft.guest_name.clone(),
            guest_email: draft.guest_email.clone(),
            guest_phone: draft.guest_phone.clone(),
            space_id: draft.space_id,
            space_category: draft.space_category,
            check_in_ms: draft.check_in_ms,
            check_out_ms: draft.check_out_ms,
            adults: draft.adults,
            children: draft.children,
            total_price: draft.total_price,
            status: BookingStatus::Pending,
            payment: PaymentStatus::Unpaid,
            special_requests: draft.special_requests.clone(),
            created_at_ms: self.clock.now_ms(),
            confirmation_code,
        };

        let published = booking.clone();
        self.feed.update(move |list| list.push(published));
        log::info!(
            "event=booking_created module=service id={} code={} space_id={}",
            booking.id,
            booking.confirmation_code,
            booking.space_id
        );
        Ok(booking)
    }

    /// Moves a booking to a new lifecycle state.
    pub fn update_status(&self, id: BookingId, status: BookingStatus) -> Option<Booking> {
        self.latency.pause();
        let updated = self.mutate(id, |booking| booking.status = status);
        if let Some(booking) = &updated {
            log::info!(
                "event=booking_status module=service id={id} status={:?}",
                booking.status
            );
        }
        updated
    }

    /// Moves a booking to a new payment state.
    pub fn update_payment(&self, id: BookingId, payment: PaymentStatus) -> Option<Booking> {
        self.latency.pause();
        let updated = self.mutate(id, |booking| booking.payment = payment);
        if let Some(booking) = &updated {
            log::info!(
                "event=booking_payment module=service id={id} payment={:?}",
                booking.payment
            );
        }
        updated
    }

    /// Cancels a booking. Cancelling an already-cancelled booking returns
    /// it as-is without publishing a snapshot.
    pub fn cancel(&self, id: BookingId) -> Option<Booking> {
        self.latency.pause();
        let current = self
            .feed
            .read(|list| list.iter().find(|b| b.id == id).cloned())?;
        if current.status == BookingStatus::Cancelled {
            return Some(current);
        }
        let updated = self.mutate(id, |booking| booking.status = BookingStatus::Cancelled);
        if updated.is_some() {
            log::info!("event=booking_cancelled module=service id={id}");
        }
        updated
    }

    /// Registers a snapshot listener; the current list is replayed to it
    /// immediately.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&[Booking]) + Send + Sync + 'static) -> Subscription {
        self.feed.subscribe(move |list| listener(list))
    }

    fn has_conflict_unpaused(&self, space_id: SpaceId, check_in_ms: i64, check_out_ms: i64) -> bool {
        self.feed.read(|list| {
            list.iter()
                .filter(|b| b.space_id == space_id && b.status != BookingStatus::Cancelled)
                .any(|b| b.overlaps(check_in_ms, check_out_ms))
        })
    }

    /// Copy-on-write mutation of one record. Returns the updated booking,
    /// or `None` (publishing nothing) when the id is unknown.
    fn mutate(&self, id: BookingId, apply: impl FnOnce(&mut Booking)) -> Option<Booking> {
        if !self.feed.read(|list| list.iter().any(|b| b.id == id)) {
            return None;
        }
        let mut updated: Option<Booking> = None;
        self.feed.update(|list| {
            if let Some(slot) = list.iter_mut().find(|b| b.id == id) {
                let mut next = slot.clone();
                apply(&mut next);
                *slot = next.clone();
                updated = Some(next);
            }
        });
        updated
    }
}

/// Draws a code not already held by any booking in `existing`. After
/// [`CODE_ATTEMPTS`] collisions the numeric tail is widened to ten digits
/// drawn from a fresh id, which no five-digit code can collide with.
fn unique_code(existing: &[Booking]) -> String {
    let mut rng = rand::thread_rng();
    for _ in 0..CODE_ATTEMPTS {
        let code = format!("{CONFIRMATION_PREFIX}{:05}", rng.gen_range(0..100_000));
        if !existing.iter().any(|b| b.confirmation_code == code) {
            return code;
        }
    }
    let tail = Uuid::new_v4().as_u128() % 10_000_000_000;
    let code = format!("{CONFIRMATION_PREFIX}{tail:010}");
    log::warn!("event=booking_code_widened module=service code={code}");
    code
}
