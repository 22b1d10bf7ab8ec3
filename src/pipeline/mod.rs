//! Extraction pipeline and background tasks
//!
//! The pipeline walks a point set image by image, builds a stack for each,
//! extracts one vector per annotated point and packages the result. Tasks
//! run the pipeline on a worker thread and stream progress back over a
//! channel.

mod events;
mod extraction;
mod rows;
mod task;

pub use events::{TaskEvent, Reporter, ChannelReporter, LogReporter, CancelToken};
pub use extraction::{ExtractionPipeline, FEEDBACK_SOURCE};
pub use rows::RowVectorizer;
pub use task::{ExtractionTask, ExtractionRequest, TaskHandle, DEFAULT_DRAIN_DELAY};
