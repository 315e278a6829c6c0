//! Seed data for a fresh installation.
//!
//! # Responsibility
//! - Provide the catalog, booking and notification records the services
//!   start from when the cache has nothing newer.
//!
//! # Invariants
//! - Ids are fixed constants, so records cached in one run still line up
//!   with seed data in the next.
//! - All timestamps are fixed epoch milliseconds; seeding never consults
//!   the clock.

use uuid::Uuid;

use crate::model::booking::{Booking, BookingStatus, PaymentStatus};
use crate::model::notification::{Notification, NotificationKind};
use crate::model::space::{
    CapacityLayout, MenuItem, OpeningHours, Space, SpaceCategory, SpaceDetails, SpaceId,
    SpaceImage, Weekday,
};

const DAY_MS: i64 = 86_400_000;
const HOUR_MS: i64 = 3_600_000;
/// 2025-01-01T00:00:00Z, the base all seed timestamps are offset from.
const SEED_EPOCH_MS: i64 = 1_735_689_600_000;

fn space_id(n: u128) -> SpaceId {
    Uuid::from_u128(0x0001_0000 + n)
}

fn booking_id(n: u128) -> Uuid {
    Uuid::from_u128(0x0002_0000 + n)
}

fn notification_id(n: u128) -> Uuid {
    Uuid::from_u128(0x0003_0000 + n)
}

fn image(url: &str, alt: &str, is_primary: bool) -> SpaceImage {
    SpaceImage {
        url: url.to_string(),
        alt: Some(alt.to_string()),
        is_primary,
    }
}

fn menu_item(name: &str, description: &str, price: f64) -> MenuItem {
    MenuItem {
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
    }
}

fn hours(day: Weekday, opens: &str, closes: &str) -> OpeningHours {
    OpeningHours {
        day,
        opens: opens.to_string(),
        closes: closes.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The seed catalog: three rooms, a restaurant, a bar and an event hall.
pub fn seed_spaces() -> Vec<Space> {
    vec![
        Space {
            id: space_id(1),
            name: "Garden View Room".to_string(),
            category: SpaceCategory::Room,
            description: "Calm double room opening onto the kitchen garden."
                .to_string(),
            images: vec![
                image("/img/spaces/garden-room-1.jpg", "Bed with garden window", true),
                image("/img/spaces/garden-room-2.jpg", "Reading corner", false),
            ],
            features: strings(&["wifi", "rain shower", "minibar"]),
            capacity: Some(2),
            price: Some(180.0),
            currency: Some("EUR".to_string()),
            available: true,
            details: Some(SpaceDetails::Room {
                bed_type: "Queen".to_string(),
                size_sqm: 28,
                view: "Garden".to_string(),
                amenities: strings(&["air conditioning", "safe", "espresso machine"]),
            }),
        },
        Space {
            id: space_id(2),
            name: "Sea View Suite".to_string(),
            category: SpaceCategory::Room,
            description: "Corner suite with a wraparound balcony over the bay."
                .to_string(),
            images: vec![
                image("/img/spaces/sea-suite-1.jpg", "Balcony at dusk", true),
                image("/img/spaces/sea-suite-2.jpg", "Living area", false),
            ],
            features: strings(&["wifi", "balcony", "bathtub", "lounge area"]),
            capacity: Some(4),
            price: Some(320.0),
            currency: Some("EUR".to_string()),
            available: true,
            details: Some(SpaceDetails::Room {
                bed_type: "King".to_string(),
                size_sqm: 52,
                view: "Sea".to_string(),
                amenities: strings(&["air conditioning", "safe", "turndown service"]),
            }),
        },
        Space {
            id: space_id(3),
            name: "Courtyard Twin".to_string(),
            category: SpaceCategory::Room,
            description: "Compact twin room on the quiet inner courtyard."
                .to_string(),
            images: vec![image(
                "/img/spaces/courtyard-twin-1.jpg",
                "Twin beds",
                true,
            )],
            features: strings(&["wifi", "desk"]),
            capacity: Some(2),
            price: Some(150.0),
            currency: Some("EUR".to_string()),
            available: true,
            details: Some(SpaceDetails::Room {
                bed_type: "Twin".to_string(),
                size_sqm: 24,
                view: "Courtyard".to_string(),
                amenities: strings(&["air conditioning", "safe"]),
            }),
        },
        Space {
            id: space_id(4),
            name: "The Veranda Restaurant".to_string(),
            category: SpaceCategory::Restaurant,
            description: "Seasonal Mediterranean kitchen on the main terrace."
                .to_string(),
            images: vec![image(
                "/img/spaces/restaurant-1.jpg",
                "Terrace tables at sunset",
                true,
            )],
            features: strings(&["terrace", "vegetarian options", "wine cellar"]),
            capacity: Some(60),
            price: None,
            currency: None,
            available: true,
            details: Some(SpaceDetails::Dining {
                cuisine: "Mediterranean".to_string(),
                menu: vec![
                    menu_item("Grilled octopus", "Charred lemon, smoked paprika", 24.0),
                    menu_item("Saffron risotto", "Aged parmesan, garden herbs", 19.0),
                    menu_item("Almond tart", "Orange blossom cream", 11.0),
                ],
                opening_hours: vec![
                    hours(Weekday::Monday, "18:00", "22:30"),
                    hours(Weekday::Friday, "18:00", "23:00"),
                    hours(Weekday::Saturday, "12:00", "23:00"),
                    hours(Weekday::Sunday, "12:00", "22:00"),
                ],
            }),
        },
        Space {
            id: space_id(5),
            name: "Lighthouse Bar".to_string(),
            category: SpaceCategory::Bar,
            description: "Rooftop bar with small plates and a long gin list."
                .to_string(),
            images: vec![image("/img/spaces/bar-1.jpg", "Bar counter", true)],
            features: strings(&["rooftop", "live music fridays"]),
            capacity: Some(35),
            price: None,
            currency: None,
            available: true,
            details: Some(SpaceDetails::Dining {
                cuisine: "Cocktails and small plates".to_string(),
                menu: vec![
                    menu_item("Smoked negroni", "House vermouth blend", 14.0),
                    menu_item("Anchovy toasts", "Cultured butter, chives", 9.0),
                ],
                opening_hours: vec![
                    hours(Weekday::Thursday, "17:00", "01:00"),
                    hours(Weekday::Friday, "17:00", "02:00"),
                    hours(Weekday::Saturday, "17:00", "02:00"),
                ],
            }),
        },
        Space {
            id: space_id(6),
            name: "Orangery Hall".to_string(),
            category: SpaceCategory::EventSpace,
            description: "Glass-roofed hall for weddings and company retreats."
                .to_string(),
            images: vec![
                image("/img/spaces/orangery-1.jpg", "Hall set for a banquet", true),
                image("/img/spaces/orangery-2.jpg", "Glass roof detail", false),
            ],
            features: strings(&["daylight", "stage", "own entrance"]),
            capacity: Some(120),
            price: None,
            currency: Some("EUR".to_string()),
            available: true,
            details: Some(SpaceDetails::Event {
                size_sqm: 240,
                price_per_day: 1_500.0,
                layouts: vec![
                    CapacityLayout {
                        name: "Theatre".to_string(),
                        capacity: 120,
                    },
                    CapacityLayout {
                        name: "Banquet".to_string(),
                        capacity: 80,
                    },
                    CapacityLayout {
                        name: "Boardroom".to_string(),
                        capacity: 30,
                    },
                ],
            }),
        },
    ]
}

/// Bookings in every lifecycle state, all against seeded rooms.
pub fn seed_bookings() -> Vec<Booking> {
    vec![
        Booking {
            id: booking_id(1),
            guest_name: "Elena Martens".to_string(),
            guest_email: "elena.martens@example.com".to_string(),
            guest_phone: "+31 6 1234 5678".to_string(),
            space_id: space_id(1),
            space_category: SpaceCategory::Room,
            check_in_ms: SEED_EPOCH_MS + 180 * DAY_MS + 15 * HOUR_MS,
            check_out_ms: SEED_EPOCH_MS + 183 * DAY_MS + 11 * HOUR_MS,
            adults: 2,
            children: 0,
            total_price: 540.0,
            status: BookingStatus::Confirmed,
            payment: PaymentStatus::Paid,
            special_requests: Some("Late arrival, around 22:00".to_string()),
            created_at_ms: SEED_EPOCH_MS + 170 * DAY_MS + 9 * HOUR_MS,
            confirmation_code: "VRD48213".to_string(),
        },
        Booking {
            id: booking_id(2),
            guest_name: "Jonas Weber".to_string(),
            guest_email: "jonas.weber@example.com".to_string(),
            guest_phone: "+49 151 000 111".to_string(),
            space_id: space_id(2),
            space_category: SpaceCategory::Room,
            check_in_ms: SEED_EPOCH_MS + 185 * DAY_MS + 15 * HOUR_MS,
            check_out_ms: SEED_EPOCH_MS + 187 * DAY_MS + 11 * HOUR_MS,
            adults: 2,
            children: 1,
            total_price: 640.0,
            status: BookingStatus::Pending,
            payment: PaymentStatus::Unpaid,
            special_requests: None,
            created_at_ms: SEED_EPOCH_MS + 176 * DAY_MS + 14 * HOUR_MS,
            confirmation_code: "VRD51902".to_string(),
        },
        Booking {
            id: booking_id(3),
            guest_name: "Priya Nair".to_string(),
            guest_email: "priya.nair@example.com".to_string(),
            guest_phone: "+44 7700 900123".to_string(),
            space_id: space_id(1),
            space_category: SpaceCategory::Room,
            check_in_ms: SEED_EPOCH_MS + 120 * DAY_MS + 15 * HOUR_MS,
            check_out_ms: SEED_EPOCH_MS + 124 * DAY_MS + 11 * HOUR_MS,
            adults: 1,
            children: 0,
            total_price: 720.0,
            status: BookingStatus::Completed,
            payment: PaymentStatus::Paid,
            special_requests: Some("Feather-free bedding".to_string()),
            created_at_ms: SEED_EPOCH_MS + 110 * DAY_MS + 10 * HOUR_MS,
            confirmation_code: "VRD33647".to_string(),
        },
        Booking {
            id: booking_id(4),
            guest_name: "Tom Akana".to_string(),
            guest_email: "tom.akana@example.com".to_string(),
            guest_phone: "+1 415 555 0101".to_string(),
            space_id: space_id(3),
            space_category: SpaceCategory::Room,
            check_in_ms: SEED_EPOCH_MS + 182 * DAY_MS + 15 * HOUR_MS,
            check_out_ms: SEED_EPOCH_MS + 184 * DAY_MS + 11 * HOUR_MS,
            adults: 1,
            children: 0,
            total_price: 300.0,
            status: BookingStatus::Cancelled,
            payment: PaymentStatus::Refunded,
            special_requests: None,
            created_at_ms: SEED_EPOCH_MS + 175 * DAY_MS + 18 * HOUR_MS,
            confirmation_code: "VRD40578".to_string(),
        },
    ]
}

/// Inbox starting point: one system broadcast, one booking alert, one
/// already-read announcement.
pub fn seed_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: notification_id(1),
            title: "New booking request".to_string(),
            message: "Jonas Weber requested the Sea View Suite for two nights."
                .to_string(),
            kind: NotificationKind::Booking,
            created_at_ms: SEED_EPOCH_MS + 176 * DAY_MS + 14 * HOUR_MS,
            read: false,
            recipient: None,
            link: Some("/admin/bookings".to_string()),
            payload: Some(serde_json::json!({
                "booking_id": booking_id(2),
            })),
        },
        Notification {
            id: notification_id(2),
            title: "Booking desk updated".to_string(),
            message: "The booking desk now shows live availability per room."
                .to_string(),
            kind: NotificationKind::System,
            created_at_ms: SEED_EPOCH_MS + 175 * DAY_MS + 8 * HOUR_MS,
            read: false,
            recipient: None,
            link: None,
            payload: None,
        },
        Notification {
            id: notification_id(3),
            title: "Summer rates published".to_string(),
            message: "Seasonal pricing is live on all room categories.".to_string(),
            kind: NotificationKind::Success,
            created_at_ms: SEED_EPOCH_MS + 174 * DAY_MS + 8 * HOUR_MS,
            read: true,
            recipient: None,
            link: Some("/admin/rates".to_string()),
            payload: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{seed_bookings, seed_notifications, seed_spaces};
    use std::collections::HashSet;

    #[test]
    fn ids_are_stable_across_calls() {
        let first = seed_spaces();
        let second = seed_spaces();
        let first_ids: Vec<_> = first.iter().map(|s| s.id).collect();
        let second_ids: Vec<_> = second.iter().map(|s| s.id).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(seed_bookings()[0].id, seed_bookings()[0].id);
    }

    #[test]
    fn ids_are_unique_within_each_set() {
        let spaces: HashSet<_> = seed_spaces().iter().map(|s| s.id).collect();
        assert_eq!(spaces.len(), seed_spaces().len());
        let bookings: HashSet<_> = seed_bookings().iter().map(|b| b.id).collect();
        assert_eq!(bookings.len(), seed_bookings().len());
        let notifications: HashSet<_> = seed_notifications().iter().map(|n| n.id).collect();
        assert_eq!(notifications.len(), seed_notifications().len());
    }

    #[test]
    fn bookings_reference_seeded_spaces() {
        let space_ids: HashSet<_> = seed_spaces().iter().map(|s| s.id).collect();
        for booking in seed_bookings() {
            assert!(space_ids.contains(&booking.space_id), "{}", booking.id);
        }
    }

    #[test]
    fn booking_date_ranges_are_well_formed() {
        for booking in seed_bookings() {
            assert!(booking.check_in_ms < booking.check_out_ms, "{}", booking.id);
        }
    }
}
