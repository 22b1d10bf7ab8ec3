//! Command pattern interfaces
//!
//! Every CLI operation is a [`Command`] built from parsed arguments by a
//! [`CommandFactory`].

use crate::errors::FeatureResult;
use crate::utils::logger::Logger;

/// An executable CLI operation
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> FeatureResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording run summaries
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> FeatureResult<Box<dyn Command + 'a>>;
}
