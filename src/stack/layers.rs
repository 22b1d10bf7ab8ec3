//! Layer definitions
//!
//! A stack is built from an ordered list of layers derived from one loaded
//! image. The list and the normalization divisor are recorded with every
//! dataset, so classification rebuilds exactly the stack the vectors were
//! extracted from.

use std::fmt;
use std::str::FromStr;
use log::debug;
use ndarray::{s, Array3, Axis};
use serde::{Deserialize, Serialize};

use crate::errors::{FeatureError, FeatureResult};
use super::raster::DEFAULT_MAX_VALUE;

/// One layer derived from the loaded image
///
/// Written as `image`, `grayscale` or `channel:N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LayerDefinition {
    /// Every channel of the image as loaded
    Image,
    /// Mean of the colour channels; a trailing alpha channel is ignored
    Grayscale,
    /// A single channel of the image
    Channel(usize),
}

impl LayerDefinition {
    /// Derive this layer from a `(height, width, channels)` image
    pub fn derive(&self, image: &Array3<f64>) -> FeatureResult<Array3<f64>> {
        let channels = image.dim().2;
        match self {
            LayerDefinition::Image => Ok(image.clone()),
            LayerDefinition::Grayscale => {
                let colour = match channels {
                    2 | 4 => channels - 1,
                    _ => channels,
                };
                image
                    .slice(s![.., .., ..colour])
                    .mean_axis(Axis(2))
                    .map(|mean| mean.insert_axis(Axis(2)))
                    .ok_or_else(|| FeatureError::InvalidStack("cannot take the grayscale of an image without channels".to_string()))
            }
            LayerDefinition::Channel(index) => {
                if *index >= channels {
                    return Err(FeatureError::InvalidStack(format!(
                        "layer {} requested but the image has {} channel(s)", self, channels
                    )));
                }
                Ok(image.slice(s![.., .., *index..*index + 1]).to_owned())
            }
        }
    }
}

impl fmt::Display for LayerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerDefinition::Image => write!(f, "image"),
            LayerDefinition::Grayscale => write!(f, "grayscale"),
            LayerDefinition::Channel(index) => write!(f, "channel:{}", index),
        }
    }
}

impl FromStr for LayerDefinition {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "image" => Ok(LayerDefinition::Image),
            "grayscale" | "gray" => Ok(LayerDefinition::Grayscale),
            _ => name
                .strip_prefix("channel:")
                .and_then(|index| index.parse::<usize>().ok())
                .map(LayerDefinition::Channel)
                .ok_or_else(|| FeatureError::InvalidParameter(format!("unknown layer '{}'", s))),
        }
    }
}

impl TryFrom<String> for LayerDefinition {
    type Error = FeatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LayerDefinition> for String {
    fn from(layer: LayerDefinition) -> Self {
        layer.to_string()
    }
}

/// Parse a comma-separated layer list such as `image,channel:0`
pub fn parse_layer_list(list: &str) -> FeatureResult<Vec<LayerDefinition>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Recipe turning one loaded image into stack layers
#[derive(Debug, Clone, PartialEq)]
pub struct StackDefinition {
    /// Layers in stacking order
    pub layers: Vec<LayerDefinition>,
    /// Divisor mapping samples into [0, 1]
    pub max_value: f64,
}

impl Default for StackDefinition {
    fn default() -> Self {
        StackDefinition {
            layers: vec![LayerDefinition::Image],
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}

impl StackDefinition {
    /// Create a stack definition
    pub fn new(layers: Vec<LayerDefinition>, max_value: f64) -> Self {
        StackDefinition { layers, max_value }
    }

    /// Derive every layer from `image`, in order
    pub fn build(&self, image: &Array3<f64>) -> FeatureResult<Vec<Array3<f64>>> {
        if self.layers.is_empty() {
            return Err(FeatureError::InvalidStack("no layers defined".to_string()));
        }
        debug!("Deriving layers [{}]", self.describe());
        self.layers.iter().map(|layer| layer.derive(image)).collect()
    }

    /// Layers as a comma-separated list
    pub fn describe(&self) -> String {
        self.layers.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    }
}
