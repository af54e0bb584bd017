use std::time::Duration;

use store::{SubscriberSet, SubscriptionId};
use tracing::debug;

/// Auto-dismiss applied to non-error notifications.
const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// How urgent a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// A toast shown by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,

    /// How long the toast stays up; `None` means until dismissed
    pub auto_dismiss: Option<Duration>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            auto_dismiss: Some(DEFAULT_DISMISS_AFTER),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            auto_dismiss: Some(DEFAULT_DISMISS_AFTER),
        }
    }

    /// Errors stick until the user dismisses them.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            auto_dismiss: None,
        }
    }
}

/// Notification fan-out. A separate subscriber set from state changes;
/// a panicking subscriber is logged and skipped.
pub struct Notifier {
    subscribers: SubscriberSet<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            subscribers: SubscriberSet::new(),
        }
    }

    pub fn subscribe(
        &self,
        handler: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.add(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn notify(&self, notification: Notification) {
        debug!(
            "notification ({:?}): {}",
            notification.severity, notification.message
        );
        self.subscribers.emit(&notification);
    }

    pub fn clear(&self) {
        self.subscribers.clear();
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn severities_and_dismissal_defaults() {
        assert_eq!(Notification::success("ok").severity, Severity::Success);
        assert_eq!(Notification::info("fyi").severity, Severity::Info);
        assert_eq!(Notification::error("bad").severity, Severity::Error);

        assert!(Notification::success("ok").auto_dismiss.is_some());
        assert!(Notification::error("bad").auto_dismiss.is_none());
    }

    #[test]
    fn notifications_reach_every_subscriber() {
        let notifier = Notifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let sink = seen.clone();
            notifier.subscribe(move |n: &Notification| {
                sink.lock().push(n.message.clone());
            });
        }

        notifier.notify(Notification::info("hello"));
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let notifier = Notifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let id = notifier.subscribe(move |n: &Notification| {
            sink.lock().push(n.message.clone());
        });

        assert!(notifier.unsubscribe(id));
        notifier.notify(Notification::info("after"));
        assert!(seen.lock().is_empty());
    }
}
