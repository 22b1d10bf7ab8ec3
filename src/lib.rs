pub mod errors;
pub mod stack;
pub mod points;
pub mod extractor;
pub mod dataset;
pub mod pipeline;
pub mod config;
pub mod utils;
pub mod cli;
pub mod commands;
pub mod api;

pub use crate::api::FeatureKit;

pub use errors::{FeatureError, FeatureResult};
pub use extractor::{ExtractorFactory, FeatureExtractor, FeatureVector};
pub use points::PointSet;
pub use dataset::{VectorPackage, PackageSummary};
pub use pipeline::{ExtractionPipeline, ExtractionTask, RowVectorizer, TaskEvent};
