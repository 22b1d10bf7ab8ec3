//! Annotated point sets
//!
//! This module loads the annotation document produced by the point
//! annotation tool: per image, per class, a list of pixel coordinates.

mod point_set;

pub use point_set::{PointSet, ImageAnnotations, ClassAnnotations, PixelPoint};
