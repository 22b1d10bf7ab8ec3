use std::path::Path;
use std::sync::Arc;
use log::info;

use crate::config::Settings;
use crate::dataset::{PackageSummary, VectorPackage};
use crate::errors::FeatureResult;
use crate::extractor::{FeatureExtractor, FeatureVector};
use crate::pipeline::{ExtractionPipeline, ExtractionRequest, ExtractionTask, LogReporter, RowVectorizer, TaskHandle};
use crate::points::PointSet;
use crate::stack::{FileImageLoader, ImageLoader};
use crate::utils::logger::Logger;

/// Main interface to the FeatureKit library
pub struct FeatureKit {
    logger: Logger,
    settings: Settings,
}

impl FeatureKit {
    /// Create a new FeatureKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to a run log; without one nothing is written to disk
    ///
    /// # Returns
    /// A FeatureKit instance or an error if the log file cannot be created
    pub fn new(log_file: Option<&str>) -> FeatureResult<Self> {
        let logger = match log_file {
            Some(path) => Logger::new(path)?,
            None => Logger::console(),
        };
        Ok(FeatureKit { logger, settings: Settings::default() })
    }

    /// Replace the default settings
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Settings used by every operation
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extract a vector package from a point file on the calling thread
    ///
    /// # Arguments
    /// * `points_path` - Point set document; images resolve relative to it
    /// * `output_path` - Where the package is written
    /// * `extractor` - Extractor applied to every point
    ///
    /// # Returns
    /// Summary of the written package or an error; nothing is written on error
    pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        points_path: P,
        output_path: Q,
        extractor: FeatureExtractor,
    ) -> FeatureResult<PackageSummary> {
        self.extract_with_loader(points_path, output_path, extractor, &FileImageLoader::new())
    }

    /// Same as [`FeatureKit::extract`] with a caller-supplied image source
    pub fn extract_with_loader<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        points_path: P,
        output_path: Q,
        extractor: FeatureExtractor,
        loader: &dyn ImageLoader,
    ) -> FeatureResult<PackageSummary> {
        let output_path = output_path.as_ref();
        let point_set = PointSet::load(points_path)?;

        let package = ExtractionPipeline::new(extractor)
            .with_stack(self.settings.stack_definition())
            .with_seed(self.settings.seed)
            .extract(&point_set, loader, &LogReporter)?;
        package.save(output_path)?;

        let summary = package.summary();
        self.logger.log_package_summary(&output_path.display().to_string(), &summary)?;
        Ok(summary)
    }

    /// Start extracting a point file on a background thread
    ///
    /// The returned handle streams progress and feedback events and can
    /// cancel the run before its next image.
    pub fn spawn_extract<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        points_path: P,
        output_path: Q,
        extractor: FeatureExtractor,
    ) -> FeatureResult<TaskHandle> {
        let point_set = PointSet::load(points_path)?;

        let mut request = ExtractionRequest::new(point_set, extractor, output_path.as_ref().to_path_buf());
        request.stack = self.settings.stack_definition();
        request.seed = self.settings.seed;
        request.drain_delay = self.settings.drain_delay();

        Ok(ExtractionTask::spawn(request, Arc::new(FileImageLoader::new())))
    }

    /// Describe a saved vector package
    ///
    /// # Arguments
    /// * `package_path` - Path to the package file
    ///
    /// # Returns
    /// Multi-line description or an error
    pub fn inspect<P: AsRef<Path>>(&self, package_path: P) -> FeatureResult<String> {
        let package_path = package_path.as_ref();
        let package = VectorPackage::load(package_path)?;
        let extractor = package.feature_extractor()?;
        let stack = package.extractor.stack_definition()?;

        let mut result = format!("Vector package {}:\n", package_path.display());
        result.push_str(&format!("{}\n", package.summary()));
        result.push_str(&format!("  Classes: {}\n", package.classes.join(", ")));
        result.push_str(&format!("  Extractor: {}\n", extractor));
        result.push_str(&format!("  Layers: {}\n", stack.describe()));
        result.push_str(&format!("  Max value: {}\n", stack.max_value));

        let mut counts = vec![0usize; package.classes.len()];
        for label in &package.labels {
            if let Some(index) = crate::dataset::hot_index(label) {
                counts[index] += 1;
            }
        }
        for (name, count) in package.classes.iter().zip(counts) {
            result.push_str(&format!("    {}: {} points\n", name, count));
        }

        self.logger.log(&result)?;
        Ok(result)
    }

    /// Vectorize every pixel of an image with a package's extractor
    ///
    /// Layers and normalization come from the package, not the settings, so
    /// the vectors match the ones the package was extracted with.
    ///
    /// # Arguments
    /// * `image_path` - Image to vectorize
    /// * `package_path` - Package whose provenance names the extractor
    ///
    /// # Returns
    /// One vector per pixel, grouped by row from top to bottom
    pub fn vectorize<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        image_path: P,
        package_path: Q,
    ) -> FeatureResult<Vec<Vec<FeatureVector>>> {
        let image_path = image_path.as_ref();
        let package = VectorPackage::load(package_path)?;
        let image = FileImageLoader::new().load(image_path)?;

        let vectorizer = RowVectorizer::from_package(&package, &image)?;
        info!("Vectorizing {} ({}x{}) with {}",
              image_path.display(), vectorizer.width(), vectorizer.height(), vectorizer.extractor());

        vectorizer.collect()
    }
}
