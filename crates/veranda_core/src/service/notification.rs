//! Notification inbox and toast fan-out.
//!
//! # Responsibility
//! - Own the notification list, newest first, and publish it as a
//!   snapshot stream.
//! - Push toast-flagged creations to the ephemeral toast channel.
//!
//! # Invariants
//! - Snapshot subscribers receive the unfiltered list; per-recipient
//!   scoping happens at query time through `visible_to`.
//! - Toasts are emitted after the list snapshot, so a toast handler that
//!   queries the inbox already sees the new entry.
//! - Changing the current user publishes nothing; the list itself did
//!   not change.

use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::clock::Clock;
use crate::fixtures;
use crate::latency::Latency;
use crate::model::notification::{
    Notification, NotificationDraft, NotificationId, NotificationKind,
};
use crate::watch::{EventFeed, SnapshotFeed, Subscription};

/// Inbox owner plus the toast side channel.
pub struct NotificationService {
    feed: SnapshotFeed<Vec<Notification>>,
    toasts: EventFeed<Notification>,
    current_user: RwLock<Option<String>>,
    clock: Arc<dyn Clock>,
    latency: Latency,
}

impl NotificationService {
    /// Creates a service seeded with the stock notification fixtures.
    pub fn new(clock: Arc<dyn Clock>, latency: Latency) -> Self {
        Self::with_seed(fixtures::seed_notifications(), clock, latency)
    }

    /// Creates a service seeded with an explicit starting inbox.
    pub fn with_seed(
        notifications: Vec<Notification>,
        clock: Arc<dyn Clock>,
        latency: Latency,
    ) -> Self {
        Self {
            feed: SnapshotFeed::new(notifications),
            toasts: EventFeed::new(),
            current_user: RwLock::new(None),
            clock,
            latency,
        }
    }

    /// Sets the user the query methods scope to. `None` turns scoping off.
    pub fn set_current_user(&self, user: Option<String>) {
        log::debug!(
            "event=notification_user module=service user={}",
            user.as_deref().unwrap_or("-")
        );
        *self
            .current_user
            .write()
            .unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// The user query methods currently scope to.
    pub fn current_user(&self) -> Option<String> {
        self.current_user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notifications visible to the current user, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.latency.pause();
        let user = self.current_user();
        self.feed.read(|list| {
            list.iter()
                .filter(|n| n.visible_to(user.as_deref()))
                .cloned()
                .collect()
        })
    }

    /// Count of visible unread notifications.
    pub fn unread_count(&self) -> usize {
        let user = self.current_user();
        self.feed.read(|list| {
            list.iter()
                .filter(|n| !n.read && n.visible_to(user.as_deref()))
                .count()
        })
    }

    /// Creates a notification at the head of the inbox.
    ///
    /// # Contract
    /// - The service assigns id and creation time; `read` starts false.
    /// - The list snapshot is published first; when the draft is
    ///   toast-flagged the toast follows.
    pub fn create(&self, draft: NotificationDraft) -> Notification {
        self.latency.pause();
        let notification = Notification {
            id: Uuid::new_v4(),
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            created_at_ms: self.clock.now_ms(),
            read: false,
            recipient: draft.recipient,
            link: draft.link,
            payload: draft.payload,
        };
        let published = notification.clone();
        self.feed.update(move |list| list.insert(0, published));
        log::info!(
            "event=notification_created module=service id={} kind={:?} toast={}",
            notification.id,
            notification.kind,
            draft.show_toast
        );
        if draft.show_toast {
            self.toasts.emit(&notification);
        }
        notification
    }

    /// Marks one notification read.
    pub fn mark_read(&self, id: NotificationId) -> Option<Notification> {
        self.latency.pause();
        if !self.feed.read(|list| list.iter().any(|n| n.id == id)) {
            return None;
        }
        let mut updated: Option<Notification> = None;
        self.feed.update(|list| {
            if let Some(slot) = list.iter_mut().find(|n| n.id == id) {
                let mut next = slot.clone();
                next.read = true;
                *slot = next.clone();
                updated = Some(next);
            }
        });
        updated
    }

    /// Marks every visible unread notification read. Returns how many
    /// changed; zero means nothing was published.
    pub fn mark_all_read(&self) -> usize {
        self.latency.pause();
        let user = self.current_user();
        let pending = self.feed.read(|list| {
            list.iter()
                .filter(|n| !n.read && n.visible_to(user.as_deref()))
                .count()
        });
        if pending == 0 {
            return 0;
        }
        self.feed.update(|list| {
            for slot in list.iter_mut() {
                if !slot.read && slot.visible_to(user.as_deref()) {
                    let mut next = slot.clone();
                    next.read = true;
                    *slot = next;
                }
            }
        });
        log::info!("event=notification_read_all module=service count={pending}");
        pending
    }

    /// Removes one notification, returning it. An unknown id publishes
    /// nothing.
    pub fn delete(&self, id: NotificationId) -> Option<Notification> {
        self.latency.pause();
        let removed = self
            .feed
            .read(|list| list.iter().find(|n| n.id == id).cloned())?;
        self.feed.update(|list| list.retain(|n| n.id != id));
        log::info!("event=notification_deleted module=service id={id}");
        Some(removed)
    }

    /// Success toast helper: creates a broadcast and pushes the toast.
    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) -> Notification {
        self.create(NotificationDraft::new(title, message, NotificationKind::Success).with_toast())
    }

    /// Error toast helper.
    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> Notification {
        self.create(NotificationDraft::new(title, message, NotificationKind::Error).with_toast())
    }

    /// Warning toast helper.
    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) -> Notification {
        self.create(NotificationDraft::new(title, message, NotificationKind::Warning).with_toast())
    }

    /// Info toast helper.
    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> Notification {
        self.create(NotificationDraft::new(title, message, NotificationKind::Info).with_toast())
    }

    /// Registers a snapshot listener on the unfiltered inbox; the current
    /// list is replayed to it immediately.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&[Notification]) + Send + Sync + 'static,
    ) -> Subscription {
        self.feed.subscribe(move |list| listener(list))
    }

    /// Registers a toast listener. Toasts are not replayed; only
    /// creations after this call are delivered.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe_toasts(
        &self,
        listener: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> Subscription {
        self.toasts.subscribe(listener)
    }
}
