use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;
use veranda_core::fixtures::seed_bookings;
use veranda_core::{
    BookingDraft, BookingService, BookingStatus, BookingValidationError, Latency, ManualClock,
    PaymentStatus, SpaceCategory,
};

fn service() -> BookingService {
    BookingService::new(Arc::new(ManualClock::starting_at(1_000_000)), Latency::None)
}

fn draft(space_id: Uuid, check_in_ms: i64, check_out_ms: i64) -> BookingDraft {
    BookingDraft {
        guest_name: "Nora Quist".to_string(),
        guest_email: "nora.quist@example.com".to_string(),
        guest_phone: "+45 00 00 00".to_string(),
        space_id,
        space_category: SpaceCategory::Room,
        check_in_ms,
        check_out_ms,
        adults: 2,
        children: 0,
        total_price: 360.0,
        special_requests: None,
    }
}

#[test]
fn create_appends_and_publishes_the_full_list() {
    let service = service();
    let lengths: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lengths);
    let _sub = service.subscribe(move |list| sink.lock().unwrap().push(list.len()));

    let created = service
        .create(&draft(Uuid::new_v4(), 1_000, 2_000))
        .unwrap();

    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.payment, PaymentStatus::Unpaid);
    assert_eq!(created.created_at_ms, 1_000_000);
    assert!(created.confirmation_code.starts_with("VRD"));

    // Replay of the seeded list, then one tick for the creation.
    assert_eq!(*lengths.lock().unwrap(), vec![4, 5]);
}

#[test]
fn confirmation_codes_are_unique_across_the_list() {
    let service = service();
    let mut codes: Vec<String> = seed_bookings()
        .into_iter()
        .map(|b| b.confirmation_code)
        .collect();
    for _ in 0..30 {
        let booking = service
            .create(&draft(Uuid::new_v4(), 1_000, 2_000))
            .unwrap();
        codes.push(booking.confirmation_code);
    }
    let mut deduped = codes.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), codes.len());
}

#[test]
fn rejected_draft_changes_nothing() {
    let service = service();
    let publishes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&publishes);
    let _sub = service.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut blank = draft(Uuid::new_v4(), 1_000, 2_000);
    blank.guest_name = "  ".to_string();
    assert_eq!(
        service.create(&blank),
        Err(BookingValidationError::BlankGuestName)
    );

    let mut inverted = draft(Uuid::new_v4(), 2_000, 1_000);
    inverted.guest_name = "Nora Quist".to_string();
    assert!(matches!(
        service.create(&inverted),
        Err(BookingValidationError::InvalidDateRange { .. })
    ));

    assert_eq!(service.bookings().len(), 4);
    // Replay only; rejected drafts publish nothing.
    assert_eq!(publishes.load(Ordering::SeqCst), 1);
}

#[test]
fn mutating_an_unknown_id_is_a_silent_no_op() {
    let service = service();
    let publishes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&publishes);
    let _sub = service.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let ghost = Uuid::new_v4();
    assert_eq!(service.update_status(ghost, BookingStatus::Confirmed), None);
    assert_eq!(service.update_payment(ghost, PaymentStatus::Paid), None);
    assert_eq!(service.cancel(ghost), None);
    assert_eq!(publishes.load(Ordering::SeqCst), 1);
}

#[test]
fn snapshots_are_isolated_from_later_mutations() {
    let service = service();
    let before = service.bookings();
    let target = before[0].id;

    service.update_status(target, BookingStatus::Completed);

    // The earlier snapshot still shows the old status.
    assert_ne!(before[0].status, BookingStatus::Completed);
    assert_eq!(
        service.booking(target).unwrap().status,
        BookingStatus::Completed
    );
}

#[test]
fn cancel_is_idempotent_and_publishes_once() {
    let service = service();
    let target = service.bookings()[0].id;
    let publishes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&publishes);
    let _sub = service.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let cancelled = service.cancel(target).unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(publishes.load(Ordering::SeqCst), 2);

    let again = service.cancel(target).unwrap();
    assert_eq!(again.status, BookingStatus::Cancelled);
    assert_eq!(publishes.load(Ordering::SeqCst), 2);
}

#[test]
fn code_lookup_normalizes_its_input() {
    let service = service();
    let seeded = &service.bookings()[0];

    let found = service
        .find_by_confirmation_code(&format!("  {}  ", seeded.confirmation_code.to_lowercase()))
        .unwrap();
    assert_eq!(found.id, seeded.id);

    assert!(service.find_by_confirmation_code("48213").is_none());
    assert!(service.find_by_confirmation_code("VRD123").is_none());
    assert!(service.find_by_confirmation_code("").is_none());
}

#[test]
fn conflict_probe_uses_half_open_ranges_and_skips_cancelled() {
    let service = service();
    let seeds = seed_bookings();
    let confirmed = &seeds[0];
    let cancelled = &seeds[3];
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Overlapping the confirmed stay conflicts.
    assert!(service.has_conflict(
        confirmed.space_id,
        confirmed.check_in_ms + 1,
        confirmed.check_out_ms + 1,
    ));
    // Back-to-back with it does not.
    assert!(!service.has_conflict(
        confirmed.space_id,
        confirmed.check_out_ms,
        confirmed.check_out_ms + 86_400_000,
    ));
    // A cancelled stay never blocks its range.
    assert!(!service.has_conflict(
        cancelled.space_id,
        cancelled.check_in_ms,
        cancelled.check_out_ms,
    ));
}

#[test]
fn guest_lookup_is_case_insensitive() {
    let service = service();
    let hits = service.bookings_for_guest(" ELENA.MARTENS@EXAMPLE.COM ");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].guest_name, "Elena Martens");
    assert!(service.bookings_for_guest("nobody@example.com").is_empty());
}

#[test]
fn space_lookup_returns_every_lifecycle_state() {
    let service = service();
    let seeds = seed_bookings();
    // Two seed bookings target the first room.
    let hits = service.bookings_for_space(seeds[0].space_id);
    assert_eq!(hits.len(), 2);
}
