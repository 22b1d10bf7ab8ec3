//! Extracted datasets and their on-disk format
//!
//! A vector package pairs every feature vector with a one-hot label and
//! records which extractor produced the vectors.

mod one_hot;
mod shuffle;
mod package;

pub use one_hot::{one_hot, hot_index, OneHotLabel};
pub use shuffle::shuffle_pairs;
pub use package::{VectorPackage, PackageSummary};
