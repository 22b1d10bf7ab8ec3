//! Configuration loading
//!
//! Settings come from an optional TOML file; command-line flags override
//! whatever the file provides.

mod settings;

pub use settings::{Settings, ExtractorSettings, DEFAULT_CONFIG_FILE};
