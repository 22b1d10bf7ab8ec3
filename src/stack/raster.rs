//! Conversion from decoded images to numeric arrays
//!
//! Arrays are shaped `(height, width, channels)` and keep the image's native
//! channel count and sample range. Normalization happens later, when the
//! array is stacked.

use image::{DynamicImage, GenericImageView};
use log::{debug, warn};
use ndarray::Array3;

use crate::errors::{FeatureError, FeatureResult};

/// Default divisor used to normalize 8-bit samples into [0, 1]
pub const DEFAULT_MAX_VALUE: f64 = 255.0;

/// Convert a decoded image into a `(height, width, channels)` array
///
/// # Arguments
/// * `image` - Image to convert
///
/// # Returns
/// The pixel samples as `f64` in their native range, or an error if the
/// buffer does not match the image dimensions
pub fn image_to_array(image: &DynamicImage) -> FeatureResult<Array3<f64>> {
    let (width, height) = image.dimensions();

    let (samples, channels) = match image {
        DynamicImage::ImageLuma8(buf) => (widen(buf.as_raw()), 1),
        DynamicImage::ImageLumaA8(buf) => (widen(buf.as_raw()), 2),
        DynamicImage::ImageRgb8(buf) => (widen(buf.as_raw()), 3),
        DynamicImage::ImageRgba8(buf) => (widen(buf.as_raw()), 4),
        DynamicImage::ImageLuma16(buf) => (widen(buf.as_raw()), 1),
        DynamicImage::ImageLumaA16(buf) => (widen(buf.as_raw()), 2),
        DynamicImage::ImageRgb16(buf) => (widen(buf.as_raw()), 3),
        DynamicImage::ImageRgba16(buf) => (widen(buf.as_raw()), 4),
        DynamicImage::ImageRgb32F(buf) => (widen(buf.as_raw()), 3),
        DynamicImage::ImageRgba32F(buf) => (widen(buf.as_raw()), 4),
        other => {
            warn!("Unrecognized pixel layout {:?}, converting to 8-bit RGB", other.color());
            (widen(other.to_rgb8().as_raw()), 3)
        }
    };

    debug!("Converted {}x{} image with {} channel(s)", width, height, channels);

    Array3::from_shape_vec((height as usize, width as usize, channels), samples)
        .map_err(|e| FeatureError::InvalidStack(format!("Pixel buffer does not match image size: {}", e)))
}

fn widen<T: Copy + Into<f64>>(raw: &[T]) -> Vec<f64> {
    raw.iter().map(|&v| v.into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_rgb_image_keeps_three_channels() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([10, 20, 30]));
        let array = image_to_array(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(array.dim(), (2, 3, 3));
        assert_eq!(array[[1, 2, 0]], 10.0);
        assert_eq!(array[[1, 2, 1]], 20.0);
        assert_eq!(array[[1, 2, 2]], 30.0);
    }

    #[test]
    fn test_gray_image_has_single_channel() {
        let img = GrayImage::from_pixel(4, 4, Luma([200]));
        let array = image_to_array(&DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(array.dim(), (4, 4, 1));
        assert!(array.iter().all(|&v| v == 200.0));
    }
}
