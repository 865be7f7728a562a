//! Observer registration and notification.

use parking_lot::Mutex;
use std::sync::Arc;

/// Observer of a world.
///
/// Callbacks run synchronously on the task that triggered the event, so a
/// slow observer stalls the entity that is notifying. Views must hand long
/// work off elsewhere.
pub trait WorldView: Send + Sync {
    /// Granular change: an entity moved or turned, or a tile changed
    fn world_has_moved(&self) {}

    /// Structural change: the entity population was modified
    fn world_has_changed(&self) {}
}

/// One channel of registered observers.
///
/// Registering the same observer twice is allowed and will notify it twice
/// per event; removing an observer that is not registered is a no-op.
/// Notification snapshots the registered list under the lock and invokes the
/// callbacks after releasing it, so a slow observer never blocks concurrent
/// registration or removal.
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn WorldView>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, view: Arc<dyn WorldView>) {
        self.listeners.lock().push(view);
    }

    /// Remove the first registration of `view`, by identity
    pub fn remove(&self, view: &Arc<dyn WorldView>) {
        let mut listeners = self.listeners.lock();
        if let Some(idx) = listeners.iter().position(|l| Arc::ptr_eq(l, view)) {
            listeners.remove(idx);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Invoke `callback` for every registered observer, in registration order
    pub fn notify<F>(&self, callback: F)
    where
        F: Fn(&dyn WorldView),
    {
        let snapshot: Vec<Arc<dyn WorldView>> = self.listeners.lock().clone();
        for view in snapshot {
            callback(view.as_ref());
        }
    }
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        moved: AtomicUsize,
    }

    impl Counter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                moved: AtomicUsize::new(0),
            })
        }
    }

    impl WorldView for Counter {
        fn world_has_moved(&self) {
            self.moved.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_notify_in_order() {
        let set = ListenerSet::new();
        let counter = Counter::new();
        set.add(counter.clone());

        set.notify(|v| v.world_has_moved());
        assert_eq!(counter.moved.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_registration_double_notifies() {
        let set = ListenerSet::new();
        let counter = Counter::new();
        set.add(counter.clone());
        set.add(counter.clone());

        set.notify(|v| v.world_has_moved());
        assert_eq!(counter.moved.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_remove_unregistered_is_noop() {
        let set = ListenerSet::new();
        let counter = Counter::new();
        let as_view: Arc<dyn WorldView> = counter.clone();
        set.remove(&as_view);
        assert!(set.is_empty());

        set.add(counter.clone());
        set.add(counter.clone());
        set.remove(&as_view);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_removed_listener_not_notified() {
        let set = ListenerSet::new();
        let counter = Counter::new();
        set.add(counter.clone());
        let as_view: Arc<dyn WorldView> = counter.clone();
        set.remove(&as_view);

        set.notify(|v| v.world_has_moved());
        assert_eq!(counter.moved.load(Ordering::SeqCst), 0);
    }
}
