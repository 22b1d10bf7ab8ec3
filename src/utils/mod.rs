//! Utility modules for common functionality
//!
//! File logging and terminal progress display used by the command layer.

pub mod logger;
pub mod progress;

pub use logger::Logger;
pub use progress::ProgressTracker;
