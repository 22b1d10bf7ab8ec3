//! Logger utility for application-wide logging
//!
//! A `log::Log` implementation that writes `[LEVEL] message` lines to a file
//! and echoes them to stderr. Commands also hold a `Logger` to record run
//! summaries; clones share one file handle, so the global backend and the
//! command summaries land in the same file. A console-only logger keeps that
//! call site uniform when no file is configured.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use log::{LevelFilter, Log, Metadata, Record};

use crate::dataset::PackageSummary;
use crate::errors::{FeatureError, FeatureResult};

/// File-backed logger
#[derive(Clone)]
pub struct Logger {
    /// File handle for log output, absent for console-only logging
    file: Arc<Mutex<Option<File>>>,
    /// Most verbose level written
    level: LevelFilter,
}

impl Logger {
    /// Creates a logger writing to `log_file`
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file, truncated if it exists
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> FeatureResult<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Arc::new(Mutex::new(Some(file))),
            level: LevelFilter::Info,
        })
    }

    /// Creates a logger that has no file and only echoes
    pub fn console() -> Self {
        Logger {
            file: Arc::new(Mutex::new(None)),
            level: LevelFilter::Info,
        }
    }

    /// Set the most verbose level written
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Whether this logger writes to a file
    pub fn has_file(&self) -> bool {
        self.file.lock().map(|f| f.is_some()).unwrap_or(false)
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> FeatureResult<()> {
        let mut guard = self.file
            .lock()
            .map_err(|_| FeatureError::GenericError("log file lock poisoned".to_string()))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs the headline numbers of a written package
    ///
    /// # Arguments
    ///
    /// * `label` - What the summary describes, usually the package path
    /// * `summary` - Package numbers to record
    pub fn log_package_summary(&self, label: &str, summary: &PackageSummary) -> FeatureResult<()> {
        self.log(&format!("Vector package {}:", label))?;
        for line in summary.to_string().lines() {
            self.log(line)?;
        }
        Ok(())
    }

    /// Install a clone of this logger as the global `log` backend
    pub fn init_global_logger(&self) {
        if log::set_boxed_logger(Box::new(self.clone())).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(self.level);
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);

            eprintln!("{}", message);
        }
    }

    fn flush(&self) {}
}
