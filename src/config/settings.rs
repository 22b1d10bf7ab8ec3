//! Extraction settings
//!
//! Example file:
//!
//! ```toml
//! max_value = 255.0
//! seed = 42
//! drain_delay_ms = 1000
//! log_file = "featurekit.log"
//! layers = ["image", "grayscale"]
//!
//! [extractor]
//! name = "Neighborhood"
//! pad = 2
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;
use log::info;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::{FeatureError, FeatureResult};
use crate::extractor::{ExtractorFactory, FeatureExtractor};
use crate::stack::{LayerDefinition, StackDefinition, DEFAULT_MAX_VALUE};

/// File read when no configuration path is given and it exists
pub const DEFAULT_CONFIG_FILE: &str = "featurekit.toml";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Divisor mapping samples into [0, 1]
    pub max_value: f64,
    /// Shuffle seed; absent means a fresh seed per run
    pub seed: Option<u64>,
    /// Pause between extraction and writing, in milliseconds
    pub drain_delay_ms: u64,
    /// Log file; absent means console logging only
    pub log_file: Option<String>,
    /// Layers derived from each image, in stacking order
    pub layers: Vec<LayerDefinition>,
    /// Extractor selection
    pub extractor: ExtractorSettings,
}

/// Extractor selection and parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    pub name: String,
    pub pad: usize,
    pub kernels: usize,
    pub solid_kernel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_value: DEFAULT_MAX_VALUE,
            seed: None,
            drain_delay_ms: 1000,
            log_file: None,
            layers: vec![LayerDefinition::Image],
            extractor: ExtractorSettings::default(),
        }
    }
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        ExtractorSettings {
            name: "WholePixel".to_string(),
            pad: 0,
            kernels: 1,
            solid_kernel: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_str(content: &str) -> FeatureResult<Self> {
        toml::from_str(content).map_err(|e| FeatureError::ConfigError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FeatureResult<Self> {
        let path = path.as_ref();
        info!("Loading settings from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load settings from `path`, or from the default file if it exists
    ///
    /// Falls back to built-in defaults when neither is available.
    pub fn load_or_default(path: Option<&str>) -> FeatureResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Settings::default()),
        }
    }

    /// Layers and normalization applied to each loaded image
    pub fn stack_definition(&self) -> StackDefinition {
        StackDefinition::new(self.layers.clone(), self.max_value)
    }

    /// Pause between extraction and writing
    pub fn drain_delay(&self) -> Duration {
        Duration::from_millis(self.drain_delay_ms)
    }
}

impl ExtractorSettings {
    /// Build the configured extractor
    pub fn build(&self) -> FeatureResult<FeatureExtractor> {
        let mut kwargs = Map::new();
        kwargs.insert("pad".to_string(), Value::from(self.pad));
        kwargs.insert("kernels".to_string(), Value::from(self.kernels));
        kwargs.insert("solid_kernel".to_string(), Value::from(self.solid_kernel));
        ExtractorFactory::create(&self.name, &kwargs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.extractor.build().unwrap(), FeatureExtractor::WholePixel);
        assert_eq!(settings.drain_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_full_file() {
        let settings = Settings::from_str(r#"
            max_value = 65535.0
            seed = 42
            drain_delay_ms = 0
            layers = ["channel:0", "gray"]

            [extractor]
            name = "Average"
            kernels = 3
            solid_kernel = true
        "#).unwrap();

        assert_eq!(settings.max_value, 65535.0);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.stack_definition(), StackDefinition::new(
            vec![LayerDefinition::Channel(0), LayerDefinition::Grayscale], 65535.0));
        assert_eq!(settings.extractor.build().unwrap(),
                   FeatureExtractor::Region { kernels: 3, solid_kernel: true });
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(Settings::from_str("max_value = ["), Err(FeatureError::ConfigError(_))));
        assert!(matches!(Settings::from_str("layers = [\"sepia\"]"), Err(FeatureError::ConfigError(_))));
    }
}
