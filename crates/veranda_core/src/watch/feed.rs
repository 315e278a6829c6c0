use std::sync::{Arc, PoisonError, RwLock, Weak};

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Registered listeners plus the monotonically growing id counter.
struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn register(&mut self, listener: Listener<T>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn detach(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// RAII handle for one registered listener. Dropping it detaches the
/// listener from its feed; leaking it keeps the listener alive for the
/// feed's lifetime.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<T: 'static>(registry: &Arc<RwLock<Registry<T>>>, id: u64) -> Self {
        let registry = Arc::downgrade(registry);
        Self {
            cancel: Some(Box::new(move || detach_from(&registry, id))),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

fn detach_from<T>(registry: &Weak<RwLock<Registry<T>>>, id: u64) {
    if let Some(registry) = registry.upgrade() {
        registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .detach(id);
    }
}

/// Replay-latest multicast cell: holds the current value and pushes every
/// replacement to all live subscribers. New subscribers immediately receive
/// the latest value before any subsequent publishes.
pub struct SnapshotFeed<T> {
    current: Arc<RwLock<T>>,
    registry: Arc<RwLock<Registry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> SnapshotFeed<T> {
    /// Creates a feed seeded with `initial` as the latest value.
    pub fn new(initial: T) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
            registry: Arc::new(RwLock::new(Registry::new())),
        }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Projects the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        f(&current)
    }

    /// Replaces the value and publishes it to all subscribers.
    pub fn set(&self, value: T) {
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = value;
        }
        self.publish();
    }

    /// Mutates the value in place, then publishes the result.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut current);
        }
        self.publish();
    }

    /// Registers a listener and replays the latest value to it right away.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(Box::new(listener));
        let subscription = Subscription::new(&self.registry, id);
        // Replay outside the registry lock so the listener may subscribe to
        // other feeds or read this one.
        let latest = self.get();
        self.deliver_to(id, &latest);
        subscription
    }

    /// Number of live subscriptions, primarily for diagnostics.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    fn publish(&self) {
        // Clone first and release the value lock: listeners are free to
        // call `get`/`read` on this feed while being notified.
        let value = self.get();
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        for (_, listener) in &registry.entries {
            listener(&value);
        }
    }

    fn deliver_to(&self, id: u64, value: &T) {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, listener)) = registry.entries.iter().find(|(entry_id, _)| *entry_id == id)
        {
            listener(value);
        }
    }
}

impl<T> Clone for SnapshotFeed<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            registry: Arc::clone(&self.registry),
        }
    }
}

/// No-replay fan-out channel: `emit` reaches the subscribers that are live
/// at that moment; later subscribers see only later events.
pub struct EventFeed<T> {
    registry: Arc<RwLock<Registry<T>>>,
}

impl<T: 'static> EventFeed<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new())),
        }
    }

    /// Registers a listener for future events only.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(Box::new(listener));
        Subscription::new(&self.registry, id)
    }

    /// Pushes one event to every live subscriber.
    pub fn emit(&self, value: &T) {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        for (_, listener) in &registry.entries {
            listener(value);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

impl<T: 'static> Default for EventFeed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventFeed<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}
