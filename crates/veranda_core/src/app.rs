//! Composition root.
//!
//! # Responsibility
//! - Open the cache database and wire storage, services and preferences
//!   into one ready-to-use bundle.
//!
//! # Invariants
//! - All members share one clock and one cache handle.
//! - The dashboard is wired last, after the feeds it mirrors exist.

use std::path::PathBuf;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::latency::Latency;
use crate::prefs::PrefsStore;
use crate::service::booking::BookingService;
use crate::service::dashboard::DashboardService;
use crate::service::notification::NotificationService;
use crate::service::space::SpaceService;
use crate::storage::KvStore;

/// Where the cache database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// On-disk database file, created when missing.
    File(PathBuf),
    /// Private in-memory database, dropped on exit.
    Memory,
}

/// Construction options for [`AppServices`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub database: DbLocation,
    /// Simulated per-call latency applied by every service.
    pub latency: Latency,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database: DbLocation::Memory,
            latency: Latency::None,
        }
    }
}

/// Every public entry point of the crate, built and wired in one call.
pub struct AppServices {
    pub kv: Arc<KvStore>,
    pub bookings: BookingService,
    pub spaces: SpaceService,
    pub notifications: NotificationService,
    pub dashboard: DashboardService,
    pub prefs: PrefsStore,
}

impl AppServices {
    /// Opens the bundle on the system clock.
    pub fn open(config: &CoreConfig) -> DbResult<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Opens the bundle on an injected clock, for tests that need to
    /// steer TTL expiry.
    pub fn open_with_clock(config: &CoreConfig, clock: Arc<dyn Clock>) -> DbResult<Self> {
        let conn = match &config.database {
            DbLocation::File(path) => open_db(path)?,
            DbLocation::Memory => open_db_in_memory()?,
        };
        let kv = Arc::new(KvStore::new(conn, Arc::clone(&clock)));
        let bookings = BookingService::new(Arc::clone(&clock), config.latency);
        let spaces = SpaceService::new(Arc::clone(&kv), config.latency);
        let notifications = NotificationService::new(Arc::clone(&clock), config.latency);
        let dashboard = DashboardService::new(&bookings, &spaces, config.latency);
        let prefs = PrefsStore::new(Arc::clone(&kv), clock);
        log::info!(
            "event=app_open module=app latency={:?} database={:?}",
            config.latency,
            config.database
        );
        Ok(Self {
            kv,
            bookings,
            spaces,
            notifications,
            dashboard,
            prefs,
        })
    }
}
