//! Point extraction command
//!
//! Loads a point file, runs the extraction on a background task and renders
//! its progress until the package is written.

use std::path::PathBuf;
use std::sync::Arc;
use clap::ArgMatches;
use log::{error, info};

use crate::commands::command_traits::Command;
use crate::commands::{required_arg, settings_from_args};
use crate::config::Settings;
use crate::errors::FeatureResult;
use crate::extractor::FeatureExtractor;
use crate::pipeline::{ExtractionRequest, ExtractionTask};
use crate::points::PointSet;
use crate::stack::FileImageLoader;
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Default package path when `--output` is absent
pub const DEFAULT_OUTPUT: &str = "vectors.json";

/// Command for extracting a vector package from a point file
pub struct ExtractCommand<'a> {
    /// Path to the point file
    points_file: String,
    /// Path to the package to write
    output_file: String,
    /// Settings after CLI overrides
    settings: Settings,
    /// Extractor built from the settings
    extractor: FeatureExtractor,
    /// Logger for recording run summaries
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording run summaries
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FeatureResult<Self> {
        let points_file = required_arg(args, "input", "point file")?;
        let output_file = args.get_one::<String>("output")
            .cloned()
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

        let settings = settings_from_args(args)?;
        let extractor = settings.extractor.build()?;
        info!("Extracting {} -> {} with {}", points_file, output_file, extractor);

        Ok(ExtractCommand {
            points_file,
            output_file,
            settings,
            extractor,
            logger,
        })
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> FeatureResult<()> {
        let point_set = PointSet::load(&self.points_file)?;
        let total = point_set.point_count() as u64;

        let mut request = ExtractionRequest::new(point_set, self.extractor, PathBuf::from(&self.output_file));
        request.stack = self.settings.stack_definition();
        request.seed = self.settings.seed;
        request.drain_delay = self.settings.drain_delay();

        let tracker = ProgressTracker::new(total, "Extracting points");
        let handle = ExtractionTask::spawn(request, Arc::new(FileImageLoader::new()));
        for event in handle.events().iter() {
            tracker.handle(&event);
        }

        let summary = handle.join().map_err(|e| {
            error!("Extraction failed: {}", e);
            e
        })?;

        self.logger.log_package_summary(&self.output_file, &summary)?;
        println!("Wrote {}\n{}", self.output_file, summary);
        Ok(())
    }
}
