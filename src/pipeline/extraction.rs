//! Point set to vector package extraction

use log::{error, info, warn};

use crate::dataset::{one_hot, VectorPackage};
use crate::errors::{FeatureError, FeatureResult};
use crate::extractor::FeatureExtractor;
use crate::points::PointSet;
use crate::stack::{ImageLoader, LayerDefinition, StackDefinition};
use super::events::{CancelToken, Reporter};

/// Source name attached to extraction feedback
pub const FEEDBACK_SOURCE: &str = "Extractor";

/// Extracts one labelled vector per annotated point
///
/// Any image that cannot be opened aborts the whole run: a dataset with some
/// images silently missing is worse than no dataset.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    extractor: FeatureExtractor,
    stack: StackDefinition,
    seed: Option<u64>,
    cancel: CancelToken,
}

impl ExtractionPipeline {
    /// Create a pipeline for `extractor` with default settings
    pub fn new(extractor: FeatureExtractor) -> Self {
        ExtractionPipeline {
            extractor,
            stack: StackDefinition::default(),
            seed: None,
            cancel: CancelToken::new(),
        }
    }

    /// Divisor used to normalize samples into [0, 1]
    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.stack.max_value = max_value;
        self
    }

    /// Layers derived from each loaded image, in stacking order
    pub fn with_layers(mut self, layers: Vec<LayerDefinition>) -> Self {
        self.stack.layers = layers;
        self
    }

    /// Replace the whole stack definition
    pub fn with_stack(mut self, stack: StackDefinition) -> Self {
        self.stack = stack;
        self
    }

    /// Seed for the final shuffle; `None` draws a fresh one per run
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Token checked between images
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The extractor used for every point
    pub fn extractor(&self) -> FeatureExtractor {
        self.extractor
    }

    /// How each loaded image is turned into a stack
    pub fn stack(&self) -> &StackDefinition {
        &self.stack
    }

    /// Extract, shuffle and package every annotated point
    ///
    /// # Arguments
    /// * `point_set` - Annotations to extract
    /// * `loader` - Source of image arrays
    /// * `reporter` - Receives progress ticks and feedback lines
    ///
    /// # Returns
    /// The shuffled package, or the first error encountered
    pub fn extract<L, R>(&self, point_set: &PointSet, loader: &L, reporter: &R) -> FeatureResult<VectorPackage>
    where
        L: ImageLoader + ?Sized,
        R: Reporter + ?Sized,
    {
        let mut package = self.extract_ordered(point_set, loader, reporter)?;
        let seed = package.shuffle(self.seed)?;
        info!("Extracted {} vectors with {}, shuffle seed {}", package.len(), self.extractor, seed);
        Ok(package)
    }

    /// Extract every annotated point without shuffling
    ///
    /// Vectors appear image by image, class by class, point by point, in
    /// document order.
    pub fn extract_ordered<L, R>(&self, point_set: &PointSet, loader: &L, reporter: &R) -> FeatureResult<VectorPackage>
    where
        L: ImageLoader + ?Sized,
        R: Reporter + ?Sized,
    {
        if let Err(e) = point_set.validate() {
            error!("Point set is inconsistent: {}", e);
            reporter.feedback(FEEDBACK_SOURCE, &e.to_string());
            return Err(e);
        }

        let num_classes = point_set.classes.len();
        let mut package = VectorPackage::new(
            point_set.classes.clone(),
            point_set.colors.clone(),
            self.extractor.provenance().with_stack(&self.stack),
        );
        let mut progress: u64 = 0;

        for image in &point_set.images {
            if self.cancel.is_cancelled() {
                warn!("Extraction cancelled before {}", image.image);
                reporter.feedback(FEEDBACK_SOURCE, "Extraction cancelled");
                return Err(FeatureError::Cancelled);
            }

            let array = match loader.load(&point_set.image_path(&image.image)) {
                Ok(array) => array,
                Err(e) => {
                    error!("Aborting extraction: {}", e);
                    reporter.feedback(FEEDBACK_SOURCE, &format!("{} could not be opened, aborting", image.image));
                    return Err(e);
                }
            };

            reporter.feedback(FEEDBACK_SOURCE, &format!("Preprocessing image -> {}", image.image));
            let layers = self.abort_on_error(reporter, self.stack.build(&array))?;
            let stack = self.abort_on_error(reporter, self.extractor.preprocess(layers, self.stack.max_value))?;

            reporter.feedback(FEEDBACK_SOURCE, "Extracting points");
            for class in &image.classes {
                let index = point_set
                    .class_index(&class.name)
                    .ok_or_else(|| FeatureError::InconsistentPointSet(class.name.clone()))?;
                let label = one_hot(index, num_classes);

                for point in &class.points {
                    let vector = self.abort_on_error(reporter, self.extractor.extract_value(&stack, point.x, point.y))?;
                    package.push(vector, label.clone());
                    progress += 1;
                    reporter.progress(progress);
                }
            }
        }

        Ok(package)
    }

    fn abort_on_error<T, R: Reporter + ?Sized>(&self, reporter: &R, result: FeatureResult<T>) -> FeatureResult<T> {
        result.map_err(|e| {
            error!("Aborting extraction: {}", e);
            reporter.feedback(FEEDBACK_SOURCE, &e.to_string());
            e
        })
    }
}
