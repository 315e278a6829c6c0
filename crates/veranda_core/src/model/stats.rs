//! Dashboard aggregate model.
//!
//! The stats value is recomputed from scratch on every booking or space
//! snapshot tick; there is no incremental aggregation to keep consistent.

use crate::model::booking::Booking;
use serde::{Deserialize, Serialize};

/// How many of the most recent bookings the dashboard shows.
pub const RECENT_BOOKINGS_LIMIT: usize = 5;

/// Aggregated back-office dashboard figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    pub completed_bookings: usize,
    /// Sum of `total_price` over non-cancelled bookings.
    pub total_revenue: f64,
    /// Percentage of spaces held by a pending or confirmed booking.
    pub occupancy_rate: f64,
    /// Newest-first, capped at [`RECENT_BOOKINGS_LIMIT`].
    pub recent_bookings: Vec<Booking>,
}
