//! Command-line argument definitions

use clap::{Arg, ArgAction, Command as ClapCommand};

use crate::extractor::ExtractorFactory;

/// Build the `featurekit` argument parser
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("FeatureKit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract labelled feature vectors from annotated images")
        .arg(
            Arg::new("input")
                .help("Point file (--extract), vector package (--inspect) or image (--vectorize)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("extract")
                .short('e')
                .long("extract")
                .help("Extract a vector package from a point file")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["inspect", "vectorize"]),
        )
        .arg(
            Arg::new("inspect")
                .short('i')
                .long("inspect")
                .help("Print the summary of a vector package (default)")
                .action(ArgAction::SetTrue)
                .conflicts_with("vectorize"),
        )
        .arg(
            Arg::new("vectorize")
                .long("vectorize")
                .help("Vectorize every pixel of an image with a package's extractor")
                .action(ArgAction::SetTrue)
                .requires("package"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("package")
                .long("package")
                .help("Vector package whose extractor is reused")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("extractor")
                .long("extractor")
                .help(format!("Extractor name ({})", ExtractorFactory::available_names().join(", ")))
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("pad")
                .long("pad")
                .help("Neighborhood half-width in pixels")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("kernels")
                .long("kernels")
                .help("Number of Region kernels")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("solid-kernel")
                .long("solid-kernel")
                .help("Average whole squares instead of rings for Region")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("layers")
                .long("layers")
                .help("Comma-separated layers derived from each image (image, grayscale, channel:N)")
                .value_name("LIST")
                .required(false),
        )
        .arg(
            Arg::new("max-value")
                .long("max-value")
                .help("Divisor mapping samples into [0, 1]")
                .value_name("V")
                .required(false),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Shuffle seed")
                .value_name("S")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML settings file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records and run summaries to this file")
                .value_name("FILE")
                .required(false),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectorize_requires_package() {
        let result = build_cli().try_get_matches_from(["featurekit", "img.png", "--vectorize"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_and_inspect_conflict() {
        let result = build_cli().try_get_matches_from(["featurekit", "p.json", "--extract", "--inspect"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_arguments() {
        let matches = build_cli()
            .try_get_matches_from(["featurekit", "p.json", "-e", "-o", "out.json", "--solid-kernel"])
            .unwrap();
        assert!(matches.get_flag("extract"));
        assert!(matches.get_flag("solid-kernel"));
        assert_eq!(matches.get_one::<String>("output").map(String::as_str), Some("out.json"));
    }

    #[test]
    fn test_extractor_help_lists_names() {
        let mut cli = build_cli();
        let help = cli.render_long_help().to_string();
        for name in ExtractorFactory::available_names() {
            assert!(help.contains(name));
        }
    }
}
