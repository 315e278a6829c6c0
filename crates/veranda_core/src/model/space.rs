//! Space domain model: rooms, dining venues, bars and event spaces.
//!
//! # Responsibility
//! - Define the catalog record shared by the public site and the back
//!   office, with per-category detail variants.
//! - Provide the draft/patch companion shapes used by space mutations.
//!
//! # Invariants
//! - `id` is stable and never reused for another space.
//! - At most one image should be flagged primary; `primary_image` falls back
//!   to the first image otherwise.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a space.
pub type SpaceId = Uuid;

/// Catalog category of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceCategory {
    Room,
    Restaurant,
    Bar,
    EventSpace,
}

/// Day of week for opening-hours rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// One catalog image. The primary image is the card/hero shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceImage {
    pub url: String,
    pub alt: Option<String>,
    pub is_primary: bool,
}

/// One dish or drink on a dining space menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Opening hours for one weekday, times as `HH:MM` local strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub day: Weekday,
    pub opens: String,
    pub closes: String,
}

/// Named seating arrangement for an event space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLayout {
    pub name: String,
    pub capacity: u32,
}

/// Category-specific detail block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceDetails {
    Room {
        bed_type: String,
        size_sqm: u32,
        view: String,
        amenities: Vec<String>,
    },
    Dining {
        cuisine: String,
        menu: Vec<MenuItem>,
        opening_hours: Vec<OpeningHours>,
    },
    Event {
        size_sqm: u32,
        price_per_day: f64,
        layouts: Vec<CapacityLayout>,
    },
}

/// One bookable or browsable hotel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    pub category: SpaceCategory,
    pub description: String,
    /// Ordered gallery; one image is flagged primary.
    pub images: Vec<SpaceImage>,
    /// Free-form feature tags shown as chips on the catalog page.
    pub features: Vec<String>,
    pub capacity: Option<u32>,
    /// Nightly price for rooms; venue price policies live in `details`.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub available: bool,
    pub details: Option<SpaceDetails>,
}

impl Space {
    /// The image flagged primary, falling back to the first one.
    pub fn primary_image(&self) -> Option<&SpaceImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }

    /// Returns a copy with the patch applied. Fields left `None` in the
    /// patch keep their current value.
    pub fn patched(&self, update: &SpaceUpdate) -> Space {
        let mut next = self.clone();
        if let Some(name) = &update.name {
            next.name = name.clone();
        }
        if let Some(description) = &update.description {
            next.description = description.clone();
        }
        if let Some(images) = &update.images {
            next.images = images.clone();
        }
        if let Some(features) = &update.features {
            next.features = features.clone();
        }
        if let Some(capacity) = update.capacity {
            next.capacity = Some(capacity);
        }
        if let Some(price) = update.price {
            next.price = Some(price);
        }
        if let Some(currency) = &update.currency {
            next.currency = Some(currency.clone());
        }
        if let Some(available) = update.available {
            next.available = available;
        }
        if let Some(details) = &update.details {
            next.details = Some(details.clone());
        }
        next
    }
}

/// Caller-supplied fields for creating a space; the service assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDraft {
    pub name: String,
    pub category: SpaceCategory,
    pub description: String,
    pub images: Vec<SpaceImage>,
    pub features: Vec<String>,
    pub capacity: Option<u32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub available: bool,
    pub details: Option<SpaceDetails>,
}

/// Field-wise patch for space updates. `None` leaves a field unchanged;
/// optional fields cannot be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<SpaceImage>>,
    pub features: Option<Vec<String>>,
    pub capacity: Option<u32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub available: Option<bool>,
    pub details: Option<SpaceDetails>,
}

#[cfg(test)]
mod tests {
    use super::{Space, SpaceCategory, SpaceImage, SpaceUpdate};
    use uuid::Uuid;

    fn space_with_images(images: Vec<SpaceImage>) -> Space {
        Space {
            id: Uuid::new_v4(),
            name: "Deluxe Room".to_string(),
            category: SpaceCategory::Room,
            description: "A room".to_string(),
            images,
            features: vec!["wifi".to_string()],
            capacity: Some(2),
            price: Some(180.0),
            currency: Some("EUR".to_string()),
            available: true,
            details: None,
        }
    }

    fn image(url: &str, is_primary: bool) -> SpaceImage {
        SpaceImage {
            url: url.to_string(),
            alt: None,
            is_primary,
        }
    }

    #[test]
    fn primary_image_prefers_flagged_entry() {
        let space = space_with_images(vec![image("a.jpg", false), image("b.jpg", true)]);
        assert_eq!(space.primary_image().map(|i| i.url.as_str()), Some("b.jpg"));
    }

    #[test]
    fn primary_image_falls_back_to_first() {
        let space = space_with_images(vec![image("a.jpg", false), image("b.jpg", false)]);
        assert_eq!(space.primary_image().map(|i| i.url.as_str()), Some("a.jpg"));

        let empty = space_with_images(Vec::new());
        assert!(empty.primary_image().is_none());
    }

    #[test]
    fn patched_applies_only_provided_fields() {
        let space = space_with_images(vec![image("a.jpg", true)]);
        let update = SpaceUpdate {
            name: Some("Premium Room".to_string()),
            available: Some(false),
            ..SpaceUpdate::default()
        };

        let next = space.patched(&update);
        assert_eq!(next.name, "Premium Room");
        assert!(!next.available);
        // Untouched fields keep their values.
        assert_eq!(next.description, space.description);
        assert_eq!(next.price, space.price);
        assert_eq!(next.images, space.images);
    }
}
