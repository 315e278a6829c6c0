//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive one end-to-end pass over the core services: browse the
//!   catalog, book a room, confirm it and watch the derived state react.
//! - Verify `veranda_core` linkage independently of any frontend.

use std::error::Error;
use std::time::Duration;

use veranda_core::{
    AppServices, BookingDraft, BookingStatus, Clock, CoreConfig, DbLocation, Latency,
    PaymentStatus, SpaceCategory, SystemClock,
};

const DAY_MS: i64 = 86_400_000;

fn main() {
    if let Err(err) = run() {
        eprintln!("veranda_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let log_dir = std::env::temp_dir().join("veranda-logs");
    veranda_core::init_logging(
        veranda_core::default_log_level(),
        &log_dir.display().to_string(),
    )?;

    println!("veranda_core version={}", veranda_core::core_version());

    let config = CoreConfig {
        database: DbLocation::Memory,
        latency: Latency::Fixed(Duration::from_millis(50)),
    };
    let app = AppServices::open(&config)?;

    let _toast_sub = app.notifications.subscribe_toasts(|toast| {
        println!("toast [{:?}] {} - {}", toast.kind, toast.title, toast.message);
    });

    let rooms = app.spaces.by_category(SpaceCategory::Room);
    let room = rooms.first().ok_or("no rooms in catalog")?;
    println!(
        "catalog: {} spaces, {} rooms, first room '{}'",
        app.spaces.spaces().len(),
        rooms.len(),
        room.name
    );

    let check_in_ms = SystemClock.now_ms() + 30 * DAY_MS;
    let check_out_ms = check_in_ms + 3 * DAY_MS;
    if app.bookings.has_conflict(room.id, check_in_ms, check_out_ms) {
        println!("room '{}' is taken for that range", room.name);
        return Ok(());
    }

    let draft = BookingDraft {
        guest_name: "Walk-in Demo".to_string(),
        guest_email: "demo@veranda.example".to_string(),
        guest_phone: "+00 000 0000".to_string(),
        space_id: room.id,
        space_category: room.category,
        check_in_ms,
        check_out_ms,
        adults: 2,
        children: 0,
        total_price: room.price.unwrap_or(0.0) * 3.0,
        special_requests: None,
    };
    let booking = app.bookings.create(&draft)?;
    println!(
        "booked 3 nights in '{}' code={}",
        room.name, booking.confirmation_code
    );
    app.notifications.success(
        "Booking received",
        format!("Confirmation code {}", booking.confirmation_code),
    );

    app.bookings
        .update_status(booking.id, BookingStatus::Confirmed)
        .ok_or("booking vanished")?;
    app.bookings
        .update_payment(booking.id, PaymentStatus::Paid)
        .ok_or("booking vanished")?;
    let found = app
        .bookings
        .find_by_confirmation_code(&booking.confirmation_code)
        .ok_or("code lookup failed")?;
    println!("lookup by code -> status={:?} payment={:?}", found.status, found.payment);

    let stats = app.dashboard.stats();
    println!(
        "dashboard: bookings={} revenue={:.2} occupancy={:.1}%",
        stats.total_bookings, stats.total_revenue, stats.occupancy_rate
    );

    app.prefs.toggle_favorite(room.id);
    app.prefs.record_view(room.id);
    println!(
        "prefs: favorites={} recently_viewed={}",
        app.prefs.favorites().len(),
        app.prefs.view_history().len()
    );

    let unread = app.notifications.unread_count();
    let marked = app.notifications.mark_all_read();
    println!("inbox: unread={unread} marked_read={marked}");

    Ok(())
}
