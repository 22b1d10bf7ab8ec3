//! Normalized, padded image layers for windowed extraction

use log::debug;
use ndarray::Array3;

use crate::errors::{FeatureError, FeatureResult};
use super::padding::pad_symmetric;

/// One or more aligned image layers ready for feature extraction
///
/// Every layer has been divided by the stack's maximum value and padded by
/// `pad` pixels on each spatial edge. All layers share the same spatial
/// size; channel depth may differ from layer to layer. Coordinates passed to
/// extractors are always un-padded; the padding shifts the origin so that a
/// window starting at `(x, y)` in padded space is centred on `(x, y)` in
/// image space.
#[derive(Debug, Clone)]
pub struct ImageStack {
    layers: Vec<Array3<f64>>,
    pad: usize,
    width: usize,
    height: usize,
}

impl ImageStack {
    /// Build a stack from raw layers
    ///
    /// # Arguments
    /// * `layers` - Arrays shaped `(height, width, channels)` sharing one spatial size
    /// * `pad` - Pixels of mirror padding to add on each spatial edge
    /// * `max_value` - Divisor mapping the source range into [0, 1]
    ///
    /// # Returns
    /// The preprocessed stack, or an error if the layers cannot be stacked
    pub fn preprocess(layers: Vec<Array3<f64>>, pad: usize, max_value: f64) -> FeatureResult<Self> {
        if !(max_value > 0.0) || !max_value.is_finite() {
            return Err(FeatureError::InvalidStack(format!("max value must be positive, got {}", max_value)));
        }

        let Some(first) = layers.first() else {
            return Err(FeatureError::InvalidStack("no layers to stack".to_string()));
        };

        let (height, width, _) = first.dim();
        if height == 0 || width == 0 {
            return Err(FeatureError::InvalidStack(format!("layer has empty extent {}x{}", width, height)));
        }

        for (index, layer) in layers.iter().enumerate() {
            let (layer_height, layer_width, channels) = layer.dim();
            if layer_height != height || layer_width != width {
                return Err(FeatureError::InvalidStack(format!(
                    "layer {} is {}x{} but layer 0 is {}x{}",
                    index, layer_width, layer_height, width, height
                )));
            }
            if channels == 0 {
                return Err(FeatureError::InvalidStack(format!("layer {} has no channels", index)));
            }
        }

        let fits = pad
            .checked_mul(2)
            .map_or(false, |border| height.checked_add(border).is_some() && width.checked_add(border).is_some());
        if !fits {
            return Err(FeatureError::InvalidStack(format!("pad {} is too large for a {}x{} image", pad, width, height)));
        }

        debug!("Stacking {} layer(s) of {}x{} with pad {} and max value {}",
               layers.len(), width, height, pad, max_value);

        let layers = layers
            .iter()
            .map(|layer| pad_symmetric(&(layer / max_value), pad))
            .collect();

        Ok(ImageStack { layers, pad, width, height })
    }

    /// Padding applied to each spatial edge
    pub fn pad(&self) -> usize {
        self.pad
    }

    /// Un-padded width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Un-padded height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total channel depth across all layers
    pub fn channels(&self) -> usize {
        self.layers.iter().map(|layer| layer.dim().2).sum()
    }

    /// The padded, normalized layers
    pub fn layers(&self) -> &[Array3<f64>] {
        &self.layers
    }

    /// Check that an un-padded coordinate lies inside the image
    pub fn check_bounds(&self, x: usize, y: usize) -> FeatureResult<()> {
        if x >= self.width || y >= self.height {
            return Err(FeatureError::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(height: usize, width: usize, channels: usize) -> Array3<f64> {
        Array3::from_shape_fn((height, width, channels), |(r, c, ch)| (r * width + c + ch) as f64)
    }

    #[test]
    fn test_preprocess_normalizes_without_padding() {
        let layer = Array3::from_elem((2, 2, 3), 255.0);
        let stack = ImageStack::preprocess(vec![layer], 0, 255.0).unwrap();
        assert_eq!(stack.pad(), 0);
        assert_eq!(stack.layers()[0].dim(), (2, 2, 3));
        assert!(stack.layers()[0].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_preprocess_pads_spatial_axes_only() {
        let stack = ImageStack::preprocess(vec![ramp(4, 5, 2)], 2, 255.0).unwrap();
        assert_eq!(stack.layers()[0].dim(), (8, 9, 2));
        assert_eq!(stack.width(), 5);
        assert_eq!(stack.height(), 4);
        assert_eq!(stack.channels(), 2);
    }

    #[test]
    fn test_overflowing_pad_is_rejected() {
        let result = ImageStack::preprocess(vec![ramp(3, 3, 1)], usize::MAX / 2 + 1, 255.0);
        assert!(matches!(result, Err(FeatureError::InvalidStack(_))));
    }

    #[test]
    fn test_layers_may_differ_in_depth() {
        let stack = ImageStack::preprocess(vec![ramp(3, 3, 3), ramp(3, 3, 1)], 1, 255.0).unwrap();
        assert_eq!(stack.channels(), 4);
        assert_eq!(stack.layers()[1].dim(), (5, 5, 1));
    }

    #[test]
    fn test_mismatched_layers_rejected() {
        let result = ImageStack::preprocess(vec![ramp(3, 3, 1), ramp(3, 4, 1)], 0, 255.0);
        assert!(matches!(result, Err(FeatureError::InvalidStack(_))));
    }

    #[test]
    fn test_empty_stack_rejected() {
        assert!(ImageStack::preprocess(Vec::new(), 0, 255.0).is_err());
        assert!(ImageStack::preprocess(vec![ramp(2, 2, 1)], 0, 0.0).is_err());
    }

    #[test]
    fn test_check_bounds() {
        let stack = ImageStack::preprocess(vec![ramp(2, 3, 1)], 1, 255.0).unwrap();
        assert!(stack.check_bounds(2, 1).is_ok());
        assert!(matches!(stack.check_bounds(3, 0), Err(FeatureError::OutOfBounds { .. })));
    }
}
