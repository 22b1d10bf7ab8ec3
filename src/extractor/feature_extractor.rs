//! Feature extractor variants
//!
//! Every variant maps an un-padded pixel coordinate to a vector of fixed
//! length. The stack is passed explicitly so the same extractor can be used
//! against any number of images, one after another or from several threads.

use std::fmt;
use ndarray::{s, Array3};

use crate::errors::{FeatureError, FeatureResult};
use crate::stack::ImageStack;
use super::region::Kernel;

/// Fixed-length numeric representation of one pixel
pub type FeatureVector = Vec<f64>;

/// The available feature extractors
///
/// The variant together with its parameters fully determines the vectors
/// produced for a given stack, which is what makes provenance sufficient to
/// rebuild an identical extractor at classification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureExtractor {
    /// The pixel's own channel values, no spatial context
    #[default]
    WholePixel,

    /// Every channel value in a `(2 * pad + 1)` square window, row-major
    Neighborhood { pad: usize },

    /// Centre pixel followed by per-channel means over `kernels` concentric kernels
    Region { kernels: usize, solid_kernel: bool },
}

impl FeatureExtractor {
    /// Name recorded in provenance
    pub fn name(&self) -> &'static str {
        match self {
            FeatureExtractor::WholePixel => "WholePixel",
            FeatureExtractor::Neighborhood { .. } => "Neighborhood",
            FeatureExtractor::Region { .. } => "Region",
        }
    }

    /// Mirror padding this extractor needs around each image
    pub fn pad(&self) -> usize {
        match self {
            FeatureExtractor::WholePixel => 0,
            FeatureExtractor::Neighborhood { pad } => *pad,
            FeatureExtractor::Region { kernels, .. } => *kernels,
        }
    }

    /// Length of every vector produced for a stack with `channels` total depth
    pub fn vector_length(&self, channels: usize) -> usize {
        match self {
            FeatureExtractor::WholePixel => channels,
            FeatureExtractor::Neighborhood { pad } => {
                let side = pad.saturating_mul(2).saturating_add(1);
                channels.saturating_mul(side).saturating_mul(side)
            }
            FeatureExtractor::Region { kernels, .. } => channels.saturating_mul(kernels.saturating_add(1)),
        }
    }

    /// Build a stack normalized by `max_value` and padded for this extractor
    pub fn preprocess(&self, layers: Vec<Array3<f64>>, max_value: f64) -> FeatureResult<ImageStack> {
        ImageStack::preprocess(layers, self.pad(), max_value)
    }

    /// Extract the vector for one pixel
    ///
    /// # Arguments
    /// * `stack` - Stack built with this extractor's padding
    /// * `x` - Un-padded column
    /// * `y` - Un-padded row
    ///
    /// # Returns
    /// The feature vector, or an error if the stack does not match or the
    /// coordinate lies outside the image
    pub fn extract_value(&self, stack: &ImageStack, x: usize, y: usize) -> FeatureResult<FeatureVector> {
        self.check_stack(stack)?;
        stack.check_bounds(x, y)?;
        Ok(self.extract_unchecked(stack, x, y))
    }

    /// Extract the vectors for every pixel of a row, left to right
    ///
    /// # Arguments
    /// * `stack` - Stack built with this extractor's padding
    /// * `y` - Un-padded row
    ///
    /// # Returns
    /// One vector per column of the un-padded width
    pub fn extract_row(&self, stack: &ImageStack, y: usize) -> FeatureResult<Vec<FeatureVector>> {
        self.check_stack(stack)?;
        stack.check_bounds(0, y)?;
        Ok((0..stack.width())
            .map(|x| self.extract_unchecked(stack, x, y))
            .collect())
    }

    fn check_stack(&self, stack: &ImageStack) -> FeatureResult<()> {
        if stack.pad() != self.pad() {
            return Err(FeatureError::StackMismatch { expected: self.pad(), actual: stack.pad() });
        }
        Ok(())
    }

    fn extract_unchecked(&self, stack: &ImageStack, x: usize, y: usize) -> FeatureVector {
        let mut vector = Vec::with_capacity(self.vector_length(stack.channels()));

        for layer in stack.layers() {
            match self {
                FeatureExtractor::WholePixel => {
                    vector.extend(layer.slice(s![y, x, ..]).iter());
                }
                FeatureExtractor::Neighborhood { pad } => {
                    // Padded origin is already shifted by `pad`
                    let side = 2 * pad + 1;
                    let window = layer.slice(s![y..y + side, x..x + side, ..]);
                    vector.extend(window.iter());
                }
                FeatureExtractor::Region { kernels, solid_kernel } => {
                    let center_x = x + kernels;
                    let center_y = y + kernels;
                    vector.extend(layer.slice(s![center_y, center_x, ..]).iter());
                    for radius in 1..=*kernels {
                        let kernel = Kernel::new(radius, *solid_kernel);
                        vector.extend(kernel.channel_means(layer, center_x, center_y));
                    }
                }
            }
        }

        vector
    }
}

impl fmt::Display for FeatureExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureExtractor::WholePixel => write!(f, "WholePixel"),
            FeatureExtractor::Neighborhood { pad } => write!(f, "Neighborhood(pad={})", pad),
            FeatureExtractor::Region { kernels, solid_kernel } =>
                write!(f, "Region(kernels={}, solid_kernel={})", kernels, solid_kernel),
        }
    }
}
