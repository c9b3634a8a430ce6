use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::notifier::telegram::MessageSender;

/// Aggregate outcome of one broadcast. `sent_to_anyone` is the signal that
/// gates persistence: an item nobody received is not committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutReport {
    pub sent_count: usize,
    pub failed: Vec<i64>,
}

impl FanoutReport {
    pub fn sent_to_anyone(&self) -> bool {
        self.sent_count > 0
    }
}

/// Delivers one message to every recipient, isolating per-recipient
/// failures. Sends are sequential; they are independent and order-blind, so
/// parallelizing them would be a local change here if throughput ever
/// demands it.
pub struct NotificationFanout {
    sender: Arc<dyn MessageSender>,
}

impl NotificationFanout {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    #[instrument(skip_all, fields(recipients = recipients.len()))]
    pub async fn notify(&self, recipients: &[i64], message: &str) -> FanoutReport {
        let mut report = FanoutReport {
            sent_count: 0,
            failed: Vec::new(),
        };

        for &chat_id in recipients {
            match self.sender.send(chat_id, message).await {
                Ok(()) => report.sent_count += 1,
                Err(err) => {
                    warn!(chat_id, error = %err, "delivery failed for recipient");
                    report.failed.push(chat_id);
                }
            }
        }

        info!(
            sent = report.sent_count,
            failed = report.failed.len(),
            "fanout complete"
        );
        report
    }
}
