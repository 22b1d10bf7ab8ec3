//! Whole-image vectorization command
//!
//! Rebuilds the extractor recorded in a package and writes the vectors of
//! every pixel of an image as nested JSON arrays, one array per row.

use std::fs::File;
use std::io::{BufWriter, Write};
use clap::ArgMatches;
use log::info;

use crate::api::FeatureKit;
use crate::commands::command_traits::Command;
use crate::commands::{required_arg, settings_from_args};
use crate::config::Settings;
use crate::errors::FeatureResult;
use crate::utils::logger::Logger;

/// Default output path when `--output` is absent
pub const DEFAULT_OUTPUT: &str = "rows.json";

/// Command for vectorizing an image with a package's extractor
pub struct VectorizeCommand<'a> {
    /// Image to vectorize
    image_file: String,
    /// Package whose provenance names the extractor
    package_file: String,
    /// Where the row vectors are written
    output_file: String,
    /// Settings after CLI overrides
    settings: Settings,
    /// Logger for recording run summaries
    logger: &'a Logger,
}

impl<'a> VectorizeCommand<'a> {
    /// Create a new vectorize command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording run summaries
    ///
    /// # Returns
    /// A new VectorizeCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FeatureResult<Self> {
        let image_file = required_arg(args, "input", "image file")?;
        let package_file = required_arg(args, "package", "--package for vectorization")?;
        let output_file = args.get_one::<String>("output")
            .cloned()
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        let settings = settings_from_args(args)?;

        Ok(VectorizeCommand {
            image_file,
            package_file,
            output_file,
            settings,
            logger,
        })
    }
}

impl<'a> Command for VectorizeCommand<'a> {
    fn execute(&self) -> FeatureResult<()> {
        let kit = FeatureKit::new(None)?.with_settings(self.settings.clone());
        let rows = kit.vectorize(&self.image_file, &self.package_file)?;

        let mut writer = BufWriter::new(File::create(&self.output_file)?);
        serde_json::to_writer(&mut writer, &rows)?;
        writer.flush()?;

        let message = format!("Wrote {} rows of {} vectors to {}",
                              rows.len(), rows.first().map(Vec::len).unwrap_or(0), self.output_file);
        info!("{}", message);
        self.logger.log(&message)?;
        println!("{}", message);
        Ok(())
    }
}
