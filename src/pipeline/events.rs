//! Progress and feedback notifications
//!
//! Long-running work reports through a [`Reporter`]: a monotonically
//! increasing progress count and `(source, message)` feedback lines.
//! Delivery is fire-and-forget; a reporter never blocks the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use crossbeam_channel::Sender;
use log::{debug, info};

use crate::dataset::PackageSummary;

/// Notification emitted by a background task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// Number of points processed so far; 0 resets after a failure
    Progress(u64),
    /// Human-readable status line
    Feedback { source: String, message: String },
    /// Final outcome, always the last event of a task
    Finished(Result<PackageSummary, String>),
}

/// Sink for progress and feedback notifications
pub trait Reporter {
    /// Report the number of points processed so far
    fn progress(&self, count: u64);

    /// Report a status line from `source`
    fn feedback(&self, source: &str, message: &str);
}

/// Discards every notification
impl Reporter for () {
    fn progress(&self, _count: u64) {}

    fn feedback(&self, _source: &str, _message: &str) {}
}

/// Reporter that writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn progress(&self, count: u64) {
        debug!("Progress: {}", count);
    }

    fn feedback(&self, source: &str, message: &str) {
        info!("({}) {}", source, message);
    }
}

/// Reporter that forwards notifications over a channel
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<TaskEvent>,
}

impl ChannelReporter {
    /// Create a reporter sending on `sender`
    pub fn new(sender: Sender<TaskEvent>) -> Self {
        ChannelReporter { sender }
    }

    /// Send an arbitrary event, ignoring a disconnected receiver
    pub fn send(&self, event: TaskEvent) {
        // Nobody listening is not an error for fire-and-forget notifications
        let _ = self.sender.send(event);
    }
}

impl Reporter for ChannelReporter {
    fn progress(&self, count: u64) {
        self.send(TaskEvent::Progress(count));
    }

    fn feedback(&self, source: &str, message: &str) {
        info!("({}) {}", source, message);
        self.send(TaskEvent::Feedback {
            source: source.to_string(),
            message: message.to_string(),
        });
    }
}

/// Shared flag used to ask a task to stop
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_reporter_preserves_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let reporter = ChannelReporter::new(tx);
        reporter.feedback("Extractor", "first");
        reporter.progress(1);
        reporter.progress(2);

        let events: Vec<TaskEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![
            TaskEvent::Feedback { source: "Extractor".to_string(), message: "first".to_string() },
            TaskEvent::Progress(1),
            TaskEvent::Progress(2),
        ]);
    }

    #[test]
    fn test_disconnected_channel_is_ignored() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        ChannelReporter::new(tx).progress(5);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
