/// Observable state container for the document client.
/// Holds an immutable snapshot, detects real changes, and fans them out
/// to subscribers.
use parking_lot::RwLock;

mod subscribers;
pub use subscribers::*;

mod app_state;
pub use app_state::*;

/// Generic observable container.
///
/// `update` applies a mutation to the current snapshot under the write
/// lock, compares the result with the previous snapshot, and notifies
/// subscribers only when the two differ. Subscribers are invoked after
/// the lock is released, so a subscriber may read the store (or mutate
/// it again) without deadlocking.
pub struct Store<T> {
    state: RwLock<T>,
    subscribers: SubscriberSet<T>,
}

impl<T: Clone + PartialEq> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: RwLock::new(initial),
            subscribers: SubscriberSet::new(),
        }
    }

    /// Current snapshot (defensive copy).
    pub fn get_state(&self) -> T {
        self.state.read().clone()
    }

    /// Apply a mutation and notify subscribers if the state changed.
    pub fn update(&self, mutate: impl FnOnce(&mut T)) {
        let changed = {
            let mut state = self.state.write();
            let previous = state.clone();
            mutate(&mut state);
            if *state == previous {
                None
            } else {
                Some(state.clone())
            }
        };

        if let Some(next) = changed {
            self.subscribers.emit(&next);
        }
    }

    /// Register a listener; returns the handle used to unsubscribe.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        self.subscribers.add(listener)
    }

    /// Remove a listener. Returns false if the handle was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Drop every listener. Used at teardown.
    pub fn clear_subscribers(&self) {
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
