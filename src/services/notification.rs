//! Notification service implementation
//!
//! Best-effort, at-most-once notification attempts, kept strictly separate
//! from durable data store writes: a write that succeeded stays succeeded
//! no matter what happens to the delivery. Failures are logged and counted,
//! never propagated.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::services::courier::Courier;

/// Running delivery counters.
#[derive(Debug, Default)]
pub struct NotificationStats {
    sent: AtomicU64,
    failed: AtomicU64,
}

impl NotificationStats {
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Notification service for fire-and-forget message delivery.
#[derive(Clone)]
pub struct NotificationService {
    courier: Arc<dyn Courier>,
    stats: Arc<NotificationStats>,
}

impl NotificationService {
    pub fn new(courier: Arc<dyn Courier>) -> Self {
        Self {
            courier,
            stats: Arc::new(NotificationStats::default()),
        }
    }

    /// Attempt one delivery. Returns whether it went through; an unreachable
    /// recipient never aborts the enclosing flow.
    pub async fn notify(&self, recipient_id: i64, text: &str) -> bool {
        match self.courier.deliver(recipient_id, text).await {
            Ok(()) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                debug!(recipient_id = recipient_id, "Notification delivered");
                true
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(recipient_id = recipient_id, error = %e, "Failed to deliver notification");
                false
            }
        }
    }

    /// Deliver the same text to many recipients, counting outcomes.
    pub async fn broadcast(&self, recipient_ids: &[i64], text: &str) -> (u64, u64) {
        let mut sent = 0;
        let mut failed = 0;

        for &recipient_id in recipient_ids {
            if self.notify(recipient_id, text).await {
                sent += 1;
            } else {
                failed += 1;
            }

            // Small delay between messages to avoid transport rate limits.
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        debug!(total = recipient_ids.len(), sent = sent, failed = failed, "Broadcast completed");
        (sent, failed)
    }

    pub fn stats(&self) -> &NotificationStats {
        &self.stats
    }
}
