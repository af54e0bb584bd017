use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;

/// Handle returned from a subscription, used to de-register it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Observer list with per-handler panic isolation.
///
/// Every fan-out in the system (state changes, live messages, connection
/// status, notifications) goes through one of these: handlers are invoked
/// in subscription order, and a panicking handler is logged and skipped
/// without affecting the others.
pub struct SubscriberSet<E> {
    entries: Mutex<Vec<(SubscriptionId, Handler<E>)>>,
    next_id: AtomicU64,
}

impl<E> SubscriberSet<E> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn add(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Idempotent; returns false if it was already gone.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every handler with the event, in subscription order.
    ///
    /// The list is snapshotted first so handlers may subscribe or
    /// unsubscribe reentrantly.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                error!("subscriber panicked, continuing with remaining subscribers");
            }
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for SubscriberSet<E> {
    fn default() -> Self {
        Self::new()
    }
}
