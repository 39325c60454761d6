use crate::models::{BatchOutcome, RejectReason};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// User-facing message produced from a batch outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Rejected { name: String, reason: RejectReason },
    Accepted { count: usize },
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::Rejected { name, reason } => format!("{}: {}", name, reason),
            Notification::Accepted { count: 1 } => "1 file added".to_string(),
            Notification::Accepted { count } => format!("{} files added", count),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Rejected { .. })
    }

    /// Machine-readable rejection code, `None` for successes
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Notification::Rejected { reason, .. } => Some(reason.code()),
            Notification::Accepted { .. } => None,
        }
    }
}

/// Receiver of user-facing messages (toasts, status bar, log)
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits one message per rejection and a single aggregate success message
/// when anything was accepted. Returns the number of messages sent.
pub fn announce(outcome: &BatchOutcome, sink: &dyn NotificationSink) -> usize {
    for rejection in &outcome.rejected {
        sink.notify(Notification::Rejected {
            name: rejection.name.clone(),
            reason: rejection.reason.clone(),
        });
    }

    let mut sent = outcome.rejected.len();
    if !outcome.accepted.is_empty() {
        sink.notify(Notification::Accepted {
            count: outcome.accepted.len(),
        });
        sent += 1;
    }
    sent
}

/// Sink that writes notifications to the log
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.code() {
            Some(code) => tracing::warn!(code, "⚠️  {}", notification.message()),
            None => tracing::info!("✅ {}", notification.message()),
        }
    }
}

/// Sink that keeps every notification in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    notifications: Mutex<Vec<Notification>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns and forgets everything collected so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rejection;

    #[test]
    fn test_announce_counts() {
        let sink = CollectingSink::new();
        let outcome = BatchOutcome {
            accepted: Vec::new(),
            rejected: vec![
                Rejection::new("a.zip", RejectReason::InvalidType {
                    mime_type: "application/zip".to_string(),
                }),
                Rejection::new("b.png", RejectReason::DuplicateFile),
            ],
        };

        assert_eq!(announce(&outcome, &sink), 2);
        let sent = sink.take();
        assert!(sent.iter().all(Notification::is_error));
        assert!(sink.notifications().is_empty());
    }

    #[test]
    fn test_empty_outcome_is_silent() {
        let sink = CollectingSink::new();
        assert_eq!(announce(&BatchOutcome::default(), &sink), 0);
        assert!(sink.notifications().is_empty());
    }

    #[test]
    fn test_messages() {
        assert_eq!(Notification::Accepted { count: 1 }.message(), "1 file added");
        assert_eq!(Notification::Accepted { count: 3 }.message(), "3 files added");
        assert_eq!(
            Notification::Rejected {
                name: "b.png".to_string(),
                reason: RejectReason::DuplicateFile
            }
            .message(),
            "b.png: File is already selected"
        );
    }

    #[test]
    fn test_rejections_carry_codes() {
        let rejected = Notification::Rejected {
            name: "big.png".to_string(),
            reason: RejectReason::TooLarge {
                size: 2,
                max_size: 1,
            },
        };
        assert_eq!(rejected.code(), Some("FILE_TOO_LARGE"));
        assert_eq!(Notification::Accepted { count: 2 }.code(), None);

        // logging sink consumes both kinds without panicking
        TracingSink.notify(rejected);
        TracingSink.notify(Notification::Accepted { count: 2 });
    }
}
