//! Factory for rebuilding extractors from provenance

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{FeatureError, FeatureResult};
use crate::stack::{LayerDefinition, StackDefinition, DEFAULT_MAX_VALUE};
use super::feature_extractor::FeatureExtractor;

/// Provenance key holding the normalization divisor
const MAX_VALUE_KEY: &str = "max_value";

/// Provenance key holding the layer list
const LAYERS_KEY: &str = "layers";

/// Largest accepted `pad` or `kernels`
///
/// Larger windows would pad every image by more pixels than any realistic
/// image holds.
pub const MAX_WINDOW_RADIUS: usize = 1024;

/// Extractor name and construction parameters saved with a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorProvenance {
    /// Extractor variant name
    pub name: String,
    /// Construction parameters keyed by parameter name
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl ExtractorProvenance {
    /// Create a provenance record
    pub fn new(name: &str, kwargs: Map<String, Value>) -> Self {
        ExtractorProvenance { name: name.to_string(), kwargs }
    }

    /// Record how images were turned into stacks
    pub fn with_stack(mut self, stack: &StackDefinition) -> Self {
        self.kwargs.insert(MAX_VALUE_KEY.to_string(), Value::from(stack.max_value));
        let layers = stack.layers.iter().map(|layer| Value::from(layer.to_string())).collect();
        self.kwargs.insert(LAYERS_KEY.to_string(), Value::Array(layers));
        self
    }

    /// The stack definition recorded with the extractor
    ///
    /// Datasets written before the stack was recorded were extracted from
    /// the bare image divided by 255, which is what missing keys default to.
    pub fn stack_definition(&self) -> FeatureResult<StackDefinition> {
        let max_value = match self.kwargs.get(MAX_VALUE_KEY) {
            None | Some(Value::Null) => DEFAULT_MAX_VALUE,
            Some(value) => match value.as_f64() {
                Some(v) if v > 0.0 && v.is_finite() => v,
                _ => return Err(FeatureError::InvalidParameter(
                    format!("'{}' must be a positive number, got {}", MAX_VALUE_KEY, value))),
            },
        };

        let layers = match self.kwargs.get(LAYERS_KEY) {
            None | Some(Value::Null) => vec![LayerDefinition::Image],
            Some(value) => serde_json::from_value::<Vec<LayerDefinition>>(value.clone())
                .map_err(|e| FeatureError::InvalidParameter(format!("'{}' is invalid: {}", LAYERS_KEY, e)))?,
        };

        Ok(StackDefinition::new(layers, max_value))
    }
}

impl FeatureExtractor {
    /// Record this extractor's name and parameters
    pub fn provenance(&self) -> ExtractorProvenance {
        let mut kwargs = Map::new();
        match self {
            FeatureExtractor::WholePixel => {}
            FeatureExtractor::Neighborhood { pad } => {
                kwargs.insert("pad".to_string(), Value::from(*pad));
            }
            FeatureExtractor::Region { kernels, solid_kernel } => {
                kwargs.insert("kernels".to_string(), Value::from(*kernels));
                kwargs.insert("solid_kernel".to_string(), Value::from(*solid_kernel));
            }
        }
        ExtractorProvenance::new(self.name(), kwargs)
    }
}

/// Factory for creating extractors by name
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create an extractor from a name and its parameters
    ///
    /// Names are matched case-insensitively. `Average` is accepted for
    /// `Region`, and `Vector` or an empty name for `WholePixel`, since older
    /// datasets were written with those names. Missing parameters take their
    /// defaults.
    ///
    /// # Arguments
    /// * `name` - Extractor name
    /// * `kwargs` - Construction parameters
    ///
    /// # Returns
    /// The extractor, or an error for unknown names and mistyped parameters
    pub fn create(name: &str, kwargs: &Map<String, Value>) -> FeatureResult<FeatureExtractor> {
        debug!("Creating extractor '{}' with {:?}", name, kwargs);

        match name.trim().to_lowercase().as_str() {
            "wholepixel" | "vector" | "" => Ok(FeatureExtractor::WholePixel),
            "neighborhood" | "neighbourhood" => {
                let pad = usize_kwarg(kwargs, "pad", 0)?;
                Ok(FeatureExtractor::Neighborhood { pad })
            }
            "region" | "average" => {
                let kernels = usize_kwarg(kwargs, "kernels", 1)?;
                let solid_kernel = bool_kwarg(kwargs, "solid_kernel", false)?;
                Ok(FeatureExtractor::Region { kernels, solid_kernel })
            }
            _ => {
                warn!("Unknown extractor name: {} (available: {})", name, Self::available_names().join(", "));
                Err(FeatureError::UnknownExtractor(name.to_string()))
            }
        }
    }

    /// Rebuild the extractor recorded in a provenance block
    pub fn from_provenance(provenance: &ExtractorProvenance) -> FeatureResult<FeatureExtractor> {
        Self::create(&provenance.name, &provenance.kwargs)
    }

    /// Canonical names of all available extractors
    pub fn available_names() -> Vec<&'static str> {
        vec!["WholePixel", "Neighborhood", "Region"]
    }
}

fn usize_kwarg(kwargs: &Map<String, Value>, key: &str, default: usize) -> FeatureResult<usize> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => match value.as_u64() {
            Some(v) if v <= MAX_WINDOW_RADIUS as u64 => Ok(v as usize),
            Some(v) => Err(FeatureError::InvalidParameter(
                format!("'{}' is {} but at most {} is supported", key, v, MAX_WINDOW_RADIUS))),
            None => Err(FeatureError::InvalidParameter(
                format!("'{}' must be a non-negative integer, got {}", key, value))),
        },
    }
}

fn bool_kwarg(kwargs: &Map<String, Value>, key: &str, default: bool) -> FeatureResult<bool> {
    match kwargs.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| FeatureError::InvalidParameter(
                format!("'{}' must be a boolean, got {}", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kwargs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_provenance_rebuilds_same_extractor() {
        let extractors = [
            FeatureExtractor::WholePixel,
            FeatureExtractor::Neighborhood { pad: 3 },
            FeatureExtractor::Region { kernels: 2, solid_kernel: true },
        ];
        for extractor in extractors {
            let rebuilt = ExtractorFactory::from_provenance(&extractor.provenance()).unwrap();
            assert_eq!(rebuilt, extractor);
        }
    }

    #[test]
    fn test_provenance_json_shape() {
        let provenance = FeatureExtractor::Neighborhood { pad: 2 }.provenance();
        let value = serde_json::to_value(&provenance).unwrap();
        assert_eq!(value, json!({"name": "Neighborhood", "kwargs": {"pad": 2}}));
    }

    #[test]
    fn test_legacy_names() {
        let average = ExtractorFactory::create("Average", &kwargs(json!({"kernels": 4, "solid_kernel": true}))).unwrap();
        assert_eq!(average, FeatureExtractor::Region { kernels: 4, solid_kernel: true });
        assert_eq!(ExtractorFactory::create("", &Map::new()).unwrap(), FeatureExtractor::WholePixel);
        assert_eq!(ExtractorFactory::create("neighborhood", &Map::new()).unwrap(),
                   FeatureExtractor::Neighborhood { pad: 0 });
    }

    #[test]
    fn test_unknown_name_rejected() {
        let result = ExtractorFactory::create("Histogram", &Map::new());
        assert!(matches!(result, Err(FeatureError::UnknownExtractor(name)) if name == "Histogram"));
    }

    #[test]
    fn test_stack_definition_round_trip() {
        let stack = StackDefinition::new(vec![LayerDefinition::Image, LayerDefinition::Grayscale], 100.0);
        let provenance = FeatureExtractor::Neighborhood { pad: 1 }.provenance().with_stack(&stack);

        assert_eq!(serde_json::to_value(&provenance).unwrap(), json!({
            "name": "Neighborhood",
            "kwargs": {"pad": 1, "max_value": 100.0, "layers": ["image", "grayscale"]}
        }));
        assert_eq!(provenance.stack_definition().unwrap(), stack);
        assert_eq!(ExtractorFactory::from_provenance(&provenance).unwrap(), FeatureExtractor::Neighborhood { pad: 1 });
    }

    #[test]
    fn test_missing_stack_keys_default() {
        let provenance = FeatureExtractor::WholePixel.provenance();
        assert_eq!(provenance.stack_definition().unwrap(), StackDefinition::default());
    }

    #[test]
    fn test_bad_stack_keys_rejected() {
        let bad_max = ExtractorProvenance::new("WholePixel", kwargs(json!({"max_value": 0})));
        assert!(matches!(bad_max.stack_definition(), Err(FeatureError::InvalidParameter(_))));
        let bad_layer = ExtractorProvenance::new("WholePixel", kwargs(json!({"layers": ["sepia"]})));
        assert!(matches!(bad_layer.stack_definition(), Err(FeatureError::InvalidParameter(_))));
    }

    #[test]
    fn test_oversized_window_rejected() {
        let result = ExtractorFactory::create("Neighborhood", &kwargs(json!({"pad": 9223372036854775807u64})));
        assert!(matches!(result, Err(FeatureError::InvalidParameter(_))));
        let result = ExtractorFactory::create("Average", &kwargs(json!({"kernels": MAX_WINDOW_RADIUS + 1})));
        assert!(matches!(result, Err(FeatureError::InvalidParameter(_))));
        assert!(ExtractorFactory::create("Neighborhood", &kwargs(json!({"pad": MAX_WINDOW_RADIUS}))).is_ok());
    }

    #[test]
    fn test_mistyped_parameter_rejected() {
        let result = ExtractorFactory::create("Neighborhood", &kwargs(json!({"pad": "two"})));
        assert!(matches!(result, Err(FeatureError::InvalidParameter(_))));
        let result = ExtractorFactory::create("Neighborhood", &kwargs(json!({"pad": -1})));
        assert!(result.is_err());
    }
}
