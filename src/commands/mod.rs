//! CLI command implementations
//!
//! This module contains the commands behind the `featurekit` binary and the
//! factory that picks one from the parsed arguments.

pub mod command_traits;
pub mod extract_command;
pub mod inspect_command;
pub mod vectorize_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use inspect_command::InspectCommand;
pub use vectorize_command::VectorizeCommand;

use std::str::FromStr;
use clap::ArgMatches;
use log::info;

use crate::config::Settings;
use crate::errors::{FeatureError, FeatureResult};
use crate::stack::parse_layer_list;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
pub struct FeaturekitCommandFactory;

impl FeaturekitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        FeaturekitCommandFactory
    }
}

impl Default for FeaturekitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for FeaturekitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> FeatureResult<Box<dyn Command + 'a>> {
        if args.get_flag("extract") {
            Ok(Box::new(ExtractCommand::new(args, logger)?))
        } else if args.get_flag("vectorize") {
            Ok(Box::new(VectorizeCommand::new(args, logger)?))
        } else {
            Ok(Box::new(InspectCommand::new(args, logger)?))
        }
    }
}

/// Read a required string argument
pub(crate) fn required_arg(args: &ArgMatches, name: &str, what: &str) -> FeatureResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| FeatureError::GenericError(format!("Missing {}", what)))
}

/// Parse an optional argument into `T`
pub(crate) fn parse_arg<T: FromStr>(args: &ArgMatches, name: &str) -> FeatureResult<Option<T>> {
    match args.get_one::<String>(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| FeatureError::InvalidParameter(format!("Invalid value for --{}: {}", name, raw))),
        None => Ok(None),
    }
}

/// Load settings from `--config` (or the default file) and apply CLI overrides
pub(crate) fn settings_from_args(args: &ArgMatches) -> FeatureResult<Settings> {
    let mut settings = Settings::load_or_default(args.get_one::<String>("config").map(String::as_str))?;

    if let Some(max_value) = parse_arg::<f64>(args, "max-value")? {
        settings.max_value = max_value;
    }
    if let Some(seed) = parse_arg::<u64>(args, "seed")? {
        settings.seed = Some(seed);
    }
    if let Some(name) = args.get_one::<String>("extractor") {
        settings.extractor.name = name.clone();
    }
    if let Some(pad) = parse_arg::<usize>(args, "pad")? {
        settings.extractor.pad = pad;
    }
    if let Some(kernels) = parse_arg::<usize>(args, "kernels")? {
        settings.extractor.kernels = kernels;
    }
    if args.get_flag("solid-kernel") {
        settings.extractor.solid_kernel = true;
    }
    if let Some(layers) = args.get_one::<String>("layers") {
        settings.layers = parse_layer_list(layers)?;
    }

    info!("Settings: max_value={}, seed={:?}, layers=[{}], extractor={}",
          settings.max_value, settings.seed, settings.stack_definition().describe(), settings.extractor.name);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::FeatureExtractor;
    use crate::stack::LayerDefinition;

    fn cli() -> clap::Command {
        crate::cli::build_cli()
    }

    #[test]
    fn test_overrides_apply_on_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.toml");
        std::fs::write(&config, "seed = 1\n[extractor]\nname = \"Neighborhood\"\npad = 1\n").unwrap();

        let args = cli().get_matches_from([
            "featurekit", "points.json", "--extract",
            "--config", config.to_str().unwrap(),
            "--pad", "3", "--max-value", "65535", "--layers", "image,gray",
        ]);
        let settings = settings_from_args(&args).unwrap();

        assert_eq!(settings.seed, Some(1));
        assert_eq!(settings.max_value, 65535.0);
        assert_eq!(settings.layers, vec![LayerDefinition::Image, LayerDefinition::Grayscale]);
        assert_eq!(settings.extractor.build().unwrap(), FeatureExtractor::Neighborhood { pad: 3 });
    }

    #[test]
    fn test_bad_number_is_invalid_parameter() {
        let args = cli().get_matches_from(["featurekit", "p.json", "--extract", "--pad", "wide"]);
        assert!(matches!(parse_arg::<usize>(&args, "pad"), Err(FeatureError::InvalidParameter(_))));
    }
}
