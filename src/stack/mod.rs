//! Image preprocessing into extraction-ready stacks
//!
//! This module turns raw pixel arrays into normalized, padded layers that
//! feature extractors read windows from.

mod padding;
mod raster;
mod layers;
mod image_stack;
mod loader;

pub use padding::{pad_symmetric, mirror_index};
pub use raster::{image_to_array, DEFAULT_MAX_VALUE};
pub use layers::{LayerDefinition, StackDefinition, parse_layer_list};
pub use image_stack::ImageStack;
pub use loader::{ImageLoader, FileImageLoader};
