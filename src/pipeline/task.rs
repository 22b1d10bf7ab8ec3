//! Background extraction tasks
//!
//! A task runs one extraction and save on its own thread. The caller gets a
//! handle with an event stream, a cancel switch and a join. Tasks own their
//! point set and share nothing mutable with the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crossbeam_channel::{unbounded, Receiver};
use log::{error, info};

use crate::dataset::PackageSummary;
use crate::errors::{FeatureError, FeatureResult};
use crate::extractor::FeatureExtractor;
use crate::points::PointSet;
use crate::stack::{ImageLoader, StackDefinition};
use super::events::{CancelToken, ChannelReporter, Reporter, TaskEvent};
use super::extraction::{ExtractionPipeline, FEEDBACK_SOURCE};

/// Pause between extraction and writing, letting listeners drain events
pub const DEFAULT_DRAIN_DELAY: Duration = Duration::from_secs(1);

/// Everything a background extraction needs
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Annotations to extract
    pub point_set: PointSet,
    /// Extractor applied to every point
    pub extractor: FeatureExtractor,
    /// Where the package is written
    pub output: PathBuf,
    /// Layers and normalization applied to each loaded image
    pub stack: StackDefinition,
    /// Shuffle seed; `None` draws a fresh one
    pub seed: Option<u64>,
    /// Pause before writing the package
    pub drain_delay: Duration,
}

impl ExtractionRequest {
    /// Create a request with default settings
    pub fn new(point_set: PointSet, extractor: FeatureExtractor, output: PathBuf) -> Self {
        ExtractionRequest {
            point_set,
            extractor,
            output,
            stack: StackDefinition::default(),
            seed: None,
            drain_delay: DEFAULT_DRAIN_DELAY,
        }
    }
}

/// Handle to a running extraction task
pub struct TaskHandle {
    events: Receiver<TaskEvent>,
    cancel: CancelToken,
    worker: JoinHandle<FeatureResult<PackageSummary>>,
}

impl TaskHandle {
    /// Ordered notifications from the task, ending with [`TaskEvent::Finished`]
    pub fn events(&self) -> &Receiver<TaskEvent> {
        &self.events
    }

    /// Ask the task to stop before its next image
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the task and return its outcome
    pub fn join(self) -> FeatureResult<PackageSummary> {
        self.worker
            .join()
            .map_err(|_| FeatureError::GenericError("extraction worker panicked".to_string()))?
    }
}

/// Launcher for background extraction
pub struct ExtractionTask;

impl ExtractionTask {
    /// Start extracting `request` on a new thread
    ///
    /// # Arguments
    /// * `request` - What to extract and where to write it
    /// * `loader` - Source of image arrays
    ///
    /// # Returns
    /// A handle for observing, cancelling and joining the task
    pub fn spawn(request: ExtractionRequest, loader: Arc<dyn ImageLoader>) -> TaskHandle {
        let (sender, events) = unbounded();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let worker = thread::spawn(move || {
            let reporter = ChannelReporter::new(sender);
            let result = Self::run(&request, loader.as_ref(), &reporter, &worker_cancel);

            if let Err(e) = &result {
                error!("Extraction task failed: {}", e);
                reporter.progress(0);
            }

            reporter.send(TaskEvent::Finished(result.as_ref().map(|s| *s).map_err(|e| e.to_string())));
            result
        });

        TaskHandle { events, cancel, worker }
    }

    fn run(
        request: &ExtractionRequest,
        loader: &dyn ImageLoader,
        reporter: &ChannelReporter,
        cancel: &CancelToken,
    ) -> FeatureResult<PackageSummary> {
        info!("Extraction task started: {} points with {}",
              request.point_set.point_count(), request.extractor);

        let pipeline = ExtractionPipeline::new(request.extractor)
            .with_stack(request.stack.clone())
            .with_seed(request.seed)
            .with_cancel_token(cancel.clone());

        let package = pipeline.extract(&request.point_set, loader, reporter)?;

        thread::sleep(request.drain_delay);
        if cancel.is_cancelled() {
            reporter.feedback(FEEDBACK_SOURCE, "Extraction cancelled, nothing written");
            return Err(FeatureError::Cancelled);
        }

        package.save(&request.output)?;
        reporter.feedback(FEEDBACK_SOURCE, &format!("Saved {} vectors to {}", package.len(), request.output.display()));

        Ok(package.summary())
    }
}
