//! Observer registry for metrics updates.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::metrics::PerformanceMetrics;

/// Callback invoked with the updated snapshot after each render measurement.
pub type ObserverCallback = Box<dyn FnMut(&PerformanceMetrics) + Send>;

/// Handle identifying a registered observer.
///
/// Observers hold no ownership over the monitor; the subscriber must pass
/// this handle back to `unsubscribe` when it is done listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of metrics observers.
///
/// Notification is synchronous and fire-and-forget, with no ordering
/// guarantee among listeners. A panicking listener is caught and logged so
/// it can neither corrupt the caller's state nor starve the remaining
/// listeners.
pub(crate) struct ObserverHub {
    observers: Vec<(ObserverId, ObserverCallback)>,
    next_id: u64,
}

impl ObserverHub {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self, callback: ObserverCallback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, callback));
        id
    }

    /// Remove an observer. Returns false if the id was already gone.
    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, metrics: &PerformanceMetrics) {
        for (id, callback) in &mut self.observers {
            if catch_unwind(AssertUnwindSafe(|| callback(metrics))).is_err() {
                tracing::warn!(
                    target: "perf::observer",
                    observer = id.0,
                    "observer panicked during notification"
                );
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for ObserverHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHub")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscribe_and_notify() {
        let mut hub = ObserverHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = count.clone();
        hub.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let metrics = PerformanceMetrics::default();
        hub.notify(&metrics);
        hub.notify(&metrics);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut hub = ObserverHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = count.clone();
        let id = hub.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let metrics = PerformanceMetrics::default();
        hub.notify(&metrics);

        assert!(hub.unsubscribe(id));
        hub.notify(&metrics);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        // A second unsubscribe of the same id is a no-op.
        assert!(!hub.unsubscribe(id));
    }

    #[test]
    fn test_observer_ids_are_unique() {
        let mut hub = ObserverHub::new();
        let a = hub.subscribe(Box::new(|_| {}));
        let b = hub.subscribe(Box::new(|_| {}));

        assert_ne!(a, b);
        assert!(hub.unsubscribe(a));
        assert_eq!(hub.len(), 1);
        assert!(hub.unsubscribe(b));
        assert_eq!(hub.len(), 0);
    }

    #[test]
    fn test_panicking_observer_does_not_starve_others() {
        let mut hub = ObserverHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        hub.subscribe(Box::new(|_| panic!("listener failure")));
        let seen = count.clone();
        hub.subscribe(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let metrics = PerformanceMetrics::default();
        hub.notify(&metrics);
        hub.notify(&metrics);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observer_receives_snapshot_fields() {
        let mut hub = ObserverHub::new();
        let item_count = Arc::new(AtomicUsize::new(0));

        let seen = item_count.clone();
        hub.subscribe(Box::new(move |metrics| {
            seen.store(metrics.item_count, Ordering::SeqCst);
        }));

        let metrics = PerformanceMetrics {
            item_count: 1234,
            ..Default::default()
        };
        hub.notify(&metrics);

        assert_eq!(item_count.load(Ordering::SeqCst), 1234);
    }
}
