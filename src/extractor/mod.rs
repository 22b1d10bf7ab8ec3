//! Feature extraction from image stacks
//!
//! This module defines the extractor variants that turn a pixel coordinate
//! into a fixed-length feature vector, and the factory that rebuilds an
//! extractor from the provenance saved next to a dataset.

mod feature_extractor;
mod region;
mod factory;

// Public exports
pub use feature_extractor::{FeatureExtractor, FeatureVector};
pub use region::Kernel;
pub use factory::{ExtractorFactory, ExtractorProvenance};
