//! Image loading collaborator
//!
//! The extraction pipeline only needs a way to turn a path into a pixel
//! array; this trait keeps the decoder pluggable so callers can feed
//! in-memory or synthetic images.

use std::path::Path;
use log::{debug, error};
use ndarray::Array3;

use crate::errors::{FeatureError, FeatureResult};
use super::raster::image_to_array;

/// Source of pixel arrays for the extraction pipeline
pub trait ImageLoader: Send + Sync {
    /// Load the image at `path` as a `(height, width, channels)` array
    ///
    /// Any read or decode failure must be reported as
    /// [`FeatureError::ImageOpen`] so the pipeline can name the file.
    fn load(&self, path: &Path) -> FeatureResult<Array3<f64>>;
}

/// Loader that decodes image files from disk with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageLoader;

impl FileImageLoader {
    /// Create a new file loader
    pub fn new() -> Self {
        FileImageLoader
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> FeatureResult<Array3<f64>> {
        debug!("Opening image {}", path.display());

        let image = image::open(path).map_err(|e| {
            error!("Failed to open image {}: {}", path.display(), e);
            FeatureError::ImageOpen {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        image_to_array(&image)
    }
}
