//! Core data layer for the Veranda hotel site.
//! This crate is the single source of truth for cached state, bookings,
//! the space catalog, notifications and the dashboard aggregate.

pub mod app;
pub mod clock;
pub mod db;
pub mod fixtures;
pub mod latency;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod service;
pub mod storage;
pub mod watch;

pub use app::{AppServices, CoreConfig, DbLocation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use latency::Latency;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::booking::{
    Booking, BookingDraft, BookingId, BookingStatus, BookingValidationError, PaymentStatus,
};
pub use model::notification::{Notification, NotificationDraft, NotificationId, NotificationKind};
pub use model::space::{Space, SpaceCategory, SpaceDetails, SpaceDraft, SpaceId, SpaceUpdate};
pub use model::stats::{DashboardStats, RECENT_BOOKINGS_LIMIT};
pub use prefs::{PrefsStore, ViewedEntry};
pub use service::booking::BookingService;
pub use service::dashboard::DashboardService;
pub use service::notification::NotificationService;
pub use service::space::{SpaceFilter, SpaceService};
pub use storage::KvStore;
pub use watch::{EventFeed, SnapshotFeed, Subscription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
