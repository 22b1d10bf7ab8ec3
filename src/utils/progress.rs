use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::TaskEvent;

/// Terminal progress bar for an extraction run
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    /// A tracker that draws nothing
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        ProgressTracker { bar }
    }

    /// Jump to an absolute position; progress events carry running totals
    pub fn set_position(&self, position: u64) {
        self.bar.set_position(position);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Print a line above the bar
    pub fn println(&self, msg: &str) {
        self.bar.println(msg);
    }

    /// Apply one task event to the bar
    pub fn handle(&self, event: &TaskEvent) {
        match event {
            TaskEvent::Progress(count) => self.set_position(*count),
            TaskEvent::Feedback { source, message } => {
                self.set_message(message);
                self.println(&format!("[{}] {}", source, message));
            }
            TaskEvent::Finished(Ok(_)) => self.finish(),
            TaskEvent::Finished(Err(e)) => self.abandon(e),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }

    pub fn abandon(&self, reason: &str) {
        self.bar.abandon_with_message(format!("Failed: {}", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PackageSummary;

    #[test]
    fn test_events_drive_position() {
        let tracker = ProgressTracker::hidden(3);
        tracker.handle(&TaskEvent::Progress(2));
        assert_eq!(tracker.position(), 2);

        tracker.handle(&TaskEvent::Progress(0));
        assert_eq!(tracker.position(), 0);

        tracker.handle(&TaskEvent::Progress(3));
        tracker.handle(&TaskEvent::Finished(Ok(PackageSummary {
            total_points: 3,
            vector_length: 3,
            num_classes: 1,
        })));
        assert_eq!(tracker.position(), 3);
    }
}
