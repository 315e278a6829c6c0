//! Booking domain model.
//!
//! # Responsibility
//! - Define the booking record, its lifecycle statuses and the creation
//!   draft callers submit.
//! - Provide the half-open date-range overlap test used for conflict
//!   detection.
//!
//! # Invariants
//! - `id` is stable and never reused for another booking.
//! - `check_in_ms < check_out_ms` for every accepted booking.
//! - `confirmation_code` is generated once at creation and never changes.

use crate::model::space::{SpaceCategory, SpaceId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a booking.
pub type BookingId = Uuid;

/// Booking lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Received but not yet confirmed by the back office.
    Pending,
    /// Confirmed and counting toward occupancy.
    Confirmed,
    /// Cancelled by the guest or the back office.
    Cancelled,
    /// Stay finished.
    Completed,
}

/// Payment progress, tracked independently of the lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

/// One guest booking of a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    /// Target space. The space record itself lives in the space service.
    pub space_id: SpaceId,
    pub space_category: SpaceCategory,
    /// Check-in instant, epoch milliseconds.
    pub check_in_ms: i64,
    /// Check-out instant, epoch milliseconds. Always after `check_in_ms`.
    pub check_out_ms: i64,
    pub adults: u32,
    pub children: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment: PaymentStatus,
    pub special_requests: Option<String>,
    /// Creation instant, epoch milliseconds.
    pub created_at_ms: i64,
    /// Short human-shareable token handed to the guest at creation.
    pub confirmation_code: String,
}

impl Booking {
    /// Half-open overlap test against a candidate date range.
    ///
    /// Ranges `[check_in, check_out)` overlap when each starts before the
    /// other ends; back-to-back stays (checkout day == checkin day) do not
    /// overlap. Lifecycle state is deliberately not consulted here.
    pub fn overlaps(&self, check_in_ms: i64, check_out_ms: i64) -> bool {
        self.check_in_ms < check_out_ms && self.check_out_ms > check_in_ms
    }
}

/// Caller-supplied fields for creating a booking.
///
/// The service generates identity, confirmation code, timestamps and the
/// default statuses; everything else comes from the draft verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub space_id: SpaceId,
    pub space_category: SpaceCategory,
    pub check_in_ms: i64,
    pub check_out_ms: i64,
    pub adults: u32,
    pub children: u32,
    pub total_price: f64,
    pub special_requests: Option<String>,
}

impl BookingDraft {
    /// Checks draft invariants before a booking is accepted.
    ///
    /// # Invariants
    /// - Guest name must not be blank after trim.
    /// - `check_in_ms` must be strictly before `check_out_ms`.
    /// - At least one adult occupant is required.
    pub fn validate(&self) -> Result<(), BookingValidationError> {
        if self.guest_name.trim().is_empty() {
            return Err(BookingValidationError::BlankGuestName);
        }
        if self.check_in_ms >= self.check_out_ms {
            return Err(BookingValidationError::InvalidDateRange {
                check_in_ms: self.check_in_ms,
                check_out_ms: self.check_out_ms,
            });
        }
        if self.adults == 0 {
            return Err(BookingValidationError::NoAdultOccupant);
        }
        Ok(())
    }
}

/// Rejection reasons for a booking draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    /// Guest name is empty after trimming whitespace.
    BlankGuestName,
    /// Check-in does not precede check-out.
    InvalidDateRange { check_in_ms: i64, check_out_ms: i64 },
    /// A booking needs at least one adult occupant.
    NoAdultOccupant,
}

impl Display for BookingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankGuestName => write!(f, "guest name must not be blank"),
            Self::InvalidDateRange {
                check_in_ms,
                check_out_ms,
            } => write!(
                f,
                "check-in ({check_in_ms}) must be before check-out ({check_out_ms})"
            ),
            Self::NoAdultOccupant => write!(f, "at least one adult occupant is required"),
        }
    }
}

impl Error for BookingValidationError {}

#[cfg(test)]
mod tests {
    use super::{Booking, BookingDraft, BookingStatus, BookingValidationError, PaymentStatus};
    use crate::model::space::SpaceCategory;
    use uuid::Uuid;

    fn draft() -> BookingDraft {
        BookingDraft {
            guest_name: "Ada Lovelace".to_string(),
            guest_email: "ada@example.com".to_string(),
            guest_phone: "+44 20 0000 0000".to_string(),
            space_id: Uuid::new_v4(),
            space_category: SpaceCategory::Room,
            check_in_ms: 1_000,
            check_out_ms: 5_000,
            adults: 2,
            children: 0,
            total_price: 420.0,
            special_requests: None,
        }
    }

    fn booking(check_in_ms: i64, check_out_ms: i64) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            guest_name: "Ada Lovelace".to_string(),
            guest_email: "ada@example.com".to_string(),
            guest_phone: "+44 20 0000 0000".to_string(),
            space_id: Uuid::new_v4(),
            space_category: SpaceCategory::Room,
            check_in_ms,
            check_out_ms,
            adults: 2,
            children: 0,
            total_price: 420.0,
            status: BookingStatus::Pending,
            payment: PaymentStatus::Unpaid,
            special_requests: None,
            created_at_ms: 0,
            confirmation_code: "VRD00001".to_string(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_guest_name() {
        let mut bad = draft();
        bad.guest_name = "   ".to_string();
        assert_eq!(
            bad.validate(),
            Err(BookingValidationError::BlankGuestName)
        );
    }

    #[test]
    fn validate_rejects_inverted_and_empty_date_ranges() {
        let mut inverted = draft();
        inverted.check_in_ms = 5_000;
        inverted.check_out_ms = 1_000;
        assert!(matches!(
            inverted.validate(),
            Err(BookingValidationError::InvalidDateRange { .. })
        ));

        let mut empty = draft();
        empty.check_out_ms = empty.check_in_ms;
        assert!(matches!(
            empty.validate(),
            Err(BookingValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_adults() {
        let mut bad = draft();
        bad.adults = 0;
        assert_eq!(bad.validate(), Err(BookingValidationError::NoAdultOccupant));
    }

    #[test]
    fn overlap_is_half_open() {
        let existing = booking(1_000, 5_000);
        // Contained and straddling ranges overlap.
        assert!(existing.overlaps(3_000, 7_000));
        assert!(existing.overlaps(0, 10_000));
        // Touching endpoints do not.
        assert!(!existing.overlaps(5_000, 8_000));
        assert!(!existing.overlaps(0, 1_000));
    }
}
