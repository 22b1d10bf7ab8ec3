//! Row-by-row vectorization of whole images
//!
//! A classifier rebuilds the extractor from a package's provenance and asks
//! for every row of a new image in turn. Rows come out top to bottom, and
//! each row holds one vector per column, left to right.

use log::{debug, info};
use ndarray::Array3;

use crate::dataset::VectorPackage;
use crate::errors::{FeatureError, FeatureResult};
use crate::extractor::{FeatureExtractor, FeatureVector};
use crate::stack::ImageStack;

/// Iterator over the feature vectors of every row of an image
#[derive(Debug, Clone)]
pub struct RowVectorizer {
    extractor: FeatureExtractor,
    stack: ImageStack,
    next_row: usize,
}

impl RowVectorizer {
    /// Prepare an image for row extraction
    ///
    /// # Arguments
    /// * `extractor` - Extractor to apply to every pixel
    /// * `layers` - Image layers shaped `(height, width, channels)`
    /// * `max_value` - Divisor mapping samples into [0, 1]
    pub fn new(extractor: FeatureExtractor, layers: Vec<Array3<f64>>, max_value: f64) -> FeatureResult<Self> {
        let stack = extractor.preprocess(layers, max_value)?;
        debug!("Row vectorizer ready: {} over {}x{}", extractor, stack.width(), stack.height());
        Ok(RowVectorizer { extractor, stack, next_row: 0 })
    }

    /// Prepare an image using the extractor and stack recorded in a package
    ///
    /// The image goes through the same layer derivation and normalization
    /// as the package's training images. It must produce vectors of the same
    /// length as the package's, otherwise a model trained on the package
    /// could not consume them.
    pub fn from_package(package: &VectorPackage, image: &Array3<f64>) -> FeatureResult<Self> {
        let extractor = package.feature_extractor()?;
        let stack = package.extractor.stack_definition()?;
        info!("Rebuilt extractor {} over layers [{}] with max value {} from package provenance",
              extractor, stack.describe(), stack.max_value);

        let vectorizer = Self::new(extractor, stack.build(image)?, stack.max_value)?;
        let expected = package.summary().vector_length;
        let actual = vectorizer.vector_length();
        if !package.is_empty() && expected != actual {
            return Err(FeatureError::InvalidStack(format!(
                "image yields vectors of length {} but the package holds length {}", actual, expected
            )));
        }

        Ok(vectorizer)
    }

    /// The extractor applied to every pixel
    pub fn extractor(&self) -> FeatureExtractor {
        self.extractor
    }

    /// Un-padded image width
    pub fn width(&self) -> usize {
        self.stack.width()
    }

    /// Un-padded image height
    pub fn height(&self) -> usize {
        self.stack.height()
    }

    /// Length of every vector this image produces
    pub fn vector_length(&self) -> usize {
        self.extractor.vector_length(self.stack.channels())
    }

    /// Vectors of one row, independent of iteration state
    pub fn row(&self, y: usize) -> FeatureResult<Vec<FeatureVector>> {
        self.extractor.extract_row(&self.stack, y)
    }
}

impl Iterator for RowVectorizer {
    type Item = FeatureResult<Vec<FeatureVector>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.stack.height() {
            return None;
        }
        let row = self.row(self.next_row);
        self.next_row += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stack.height().saturating_sub(self.next_row);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use crate::extractor::ExtractorProvenance;
    use crate::stack::{LayerDefinition, StackDefinition};

    fn image() -> Array3<f64> {
        Array3::from_shape_fn((3, 4, 2), |(r, c, ch)| (r * 8 + c * 2 + ch) as f64)
    }

    #[test]
    fn test_yields_every_row_in_order() {
        let extractor = FeatureExtractor::Neighborhood { pad: 1 };
        let vectorizer = RowVectorizer::new(extractor, vec![image()], 1.0).unwrap();
        let reference = vectorizer.clone();

        let rows: Vec<Vec<FeatureVector>> = vectorizer.collect::<FeatureResult<_>>().unwrap();
        assert_eq!(rows.len(), 3);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 4);
            assert_eq!(row, &reference.row(y).unwrap());
            assert!(row.iter().all(|v| v.len() == 2 * 9));
        }
    }

    #[test]
    fn test_from_package_uses_provenance() {
        let extractor = FeatureExtractor::Region { kernels: 1, solid_kernel: false };
        let mut package = VectorPackage::new(vec!["a".to_string()], Map::new(), extractor.provenance());
        package.push(vec![0.0; 4], vec![1]);

        let vectorizer = RowVectorizer::from_package(&package, &image()).unwrap();
        assert_eq!(vectorizer.extractor(), extractor);
        assert_eq!(vectorizer.vector_length(), 4);
    }

    #[test]
    fn test_from_package_rejects_channel_mismatch() {
        let extractor = FeatureExtractor::WholePixel;
        let mut package = VectorPackage::new(vec!["a".to_string()], Map::new(), extractor.provenance());
        package.push(vec![0.0; 3], vec![1]);

        let result = RowVectorizer::from_package(&package, &image());
        assert!(matches!(result, Err(FeatureError::InvalidStack(_))));
    }

    #[test]
    fn test_from_package_rebuilds_recorded_stack() {
        let extractor = FeatureExtractor::Neighborhood { pad: 1 };
        let stack = StackDefinition::new(vec![LayerDefinition::Channel(1), LayerDefinition::Image], 100.0);
        let mut package = VectorPackage::new(vec!["a".to_string()], Map::new(), extractor.provenance().with_stack(&stack));
        package.push(vec![0.0; 3 * 9], vec![1]);

        let vectorizer = RowVectorizer::from_package(&package, &image()).unwrap();
        let expected = RowVectorizer::new(extractor, stack.build(&image()).unwrap(), 100.0).unwrap();
        assert_eq!(vectorizer.vector_length(), 3 * 9);
        assert_eq!(vectorizer.row(1).unwrap(), expected.row(1).unwrap());
    }

    #[test]
    fn test_oversized_pad_in_package_is_an_error() {
        let provenance = ExtractorProvenance::new("Neighborhood", serde_json::from_str(r#"{"pad": 9223372036854775807}"#).unwrap());
        let package = VectorPackage::new(vec!["a".to_string()], Map::new(), provenance);

        let result = RowVectorizer::from_package(&package, &image());
        assert!(matches!(result, Err(FeatureError::InvalidParameter(_))));
    }
}
