//! Notification domain model.
//!
//! # Responsibility
//! - Define the notification record shared by the bell/inbox list and the
//!   ephemeral toast channel.
//!
//! # Invariants
//! - `read` is the only field that changes after creation, and changing it
//!   still replaces the whole record in the published list.
//! - `recipient = None` means the notification is a broadcast.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a notification.
pub type NotificationId = Uuid;

/// Visual and semantic category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
    /// Raised by booking lifecycle changes.
    Booking,
    /// Raised by the platform itself (maintenance, announcements).
    System,
}

/// One notification in the persistent inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Creation instant, epoch milliseconds.
    pub created_at_ms: i64,
    pub read: bool,
    /// Target user id; `None` is a broadcast to everyone.
    pub recipient: Option<String>,
    /// Optional deep-link the UI navigates to on click.
    pub link: Option<String>,
    /// Free-form payload attached by the producer.
    pub payload: Option<serde_json::Value>,
}

impl Notification {
    /// Per-recipient display filter: broadcasts are visible to everybody,
    /// targeted notifications only to the matching user. With no current
    /// user set, everything is visible. This is a display convenience, not
    /// an authorization check.
    pub fn visible_to(&self, current_user: Option<&str>) -> bool {
        match current_user {
            None => true,
            Some(user) => match &self.recipient {
                None => true,
                Some(recipient) => recipient == user,
            },
        }
    }
}

/// Caller-supplied fields for creating a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub recipient: Option<String>,
    pub link: Option<String>,
    pub payload: Option<serde_json::Value>,
    /// When set, the creation is also pushed to the ephemeral toast channel.
    pub show_toast: bool,
}

impl NotificationDraft {
    /// Broadcast draft with only the fields every caller provides.
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            recipient: None,
            link: None,
            payload: None,
            show_toast: false,
        }
    }

    /// Same draft, flagged for toast fan-out.
    pub fn with_toast(mut self) -> Self {
        self.show_toast = true;
        self
    }

    /// Same draft, targeted at one recipient id.
    pub fn for_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }
}
