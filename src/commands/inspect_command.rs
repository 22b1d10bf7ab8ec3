//! Package inspection command

use clap::ArgMatches;

use crate::api::FeatureKit;
use crate::commands::command_traits::Command;
use crate::commands::required_arg;
use crate::errors::FeatureResult;
use crate::utils::logger::Logger;

/// Command printing the summary of a vector package
pub struct InspectCommand<'a> {
    /// Path to the package file
    package_file: String,
    /// Logger for recording run summaries
    logger: &'a Logger,
}

impl<'a> InspectCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FeatureResult<Self> {
        let package_file = required_arg(args, "input", "package file")?;
        Ok(InspectCommand { package_file, logger })
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn execute(&self) -> FeatureResult<()> {
        let report = FeatureKit::new(None)?.inspect(&self.package_file)?;

        self.logger.log(&report)?;
        print!("{}", report);
        Ok(())
    }
}
