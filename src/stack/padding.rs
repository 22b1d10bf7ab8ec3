//! Symmetric (mirror) padding of raster arrays
//!
//! Padding reflects the image across its border including the edge sample,
//! so a row `a b c` padded by two becomes `b a a b c c b`. Only the two
//! spatial axes are padded; the channel axis is left untouched.

use ndarray::Array3;

/// Map a possibly out-of-range index onto `0..len` by mirroring
///
/// The mirrored sequence repeats with period `2 * len`, which also covers
/// pads wider than the image itself.
///
/// # Arguments
/// * `index` - Index relative to the un-padded axis, may be negative
/// * `len` - Length of the un-padded axis, must be non-zero
///
/// # Returns
/// The source index to read from
pub fn mirror_index(index: isize, len: usize) -> usize {
    debug_assert!(len > 0, "cannot mirror into an empty axis");
    let period = 2 * len as isize;
    let folded = index.rem_euclid(period);
    if folded < len as isize {
        folded as usize
    } else {
        (period - 1 - folded) as usize
    }
}

/// Pad an array symmetrically by `pad` pixels on every spatial edge
///
/// # Arguments
/// * `array` - Array shaped `(height, width, channels)`
/// * `pad` - Number of pixels to add on each side of both spatial axes
///
/// # Returns
/// A new array shaped `(height + 2 * pad, width + 2 * pad, channels)`
pub fn pad_symmetric(array: &Array3<f64>, pad: usize) -> Array3<f64> {
    if pad == 0 {
        return array.clone();
    }

    let (height, width, channels) = array.dim();
    let offset = pad as isize;

    Array3::from_shape_fn((height + 2 * pad, width + 2 * pad, channels), |(row, col, channel)| {
        let src_row = mirror_index(row as isize - offset, height);
        let src_col = mirror_index(col as isize - offset, width);
        array[[src_row, src_col, channel]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_mirror_index_inside_range_is_identity() {
        for i in 0..5 {
            assert_eq!(mirror_index(i, 5), i as usize);
        }
    }

    #[test]
    fn test_mirror_index_reflects_including_edge() {
        assert_eq!(mirror_index(-1, 3), 0);
        assert_eq!(mirror_index(-2, 3), 1);
        assert_eq!(mirror_index(3, 3), 2);
        assert_eq!(mirror_index(4, 3), 1);
    }

    #[test]
    fn test_mirror_index_wider_than_axis() {
        // np.pad([1, 2], 3, mode='symmetric') == [2, 2, 1, 1, 2, 2, 1, 1]
        let source = [1, 2];
        let padded: Vec<i32> = (-3..5).map(|i| source[mirror_index(i, 2)]).collect();
        assert_eq!(padded, vec![2, 2, 1, 1, 2, 2, 1, 1]);
    }

    #[test]
    fn test_pad_symmetric_row() {
        let array = Array3::from_shape_vec((1, 3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let padded = pad_symmetric(&array, 2);
        assert_eq!(padded.dim(), (5, 7, 1));
        let middle: Vec<f64> = (0..7).map(|c| padded[[2, c, 0]]).collect();
        assert_eq!(middle, vec![2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 2.0]);
    }

    #[test]
    fn test_pad_symmetric_keeps_channels() {
        let array = Array3::from_shape_fn((2, 2, 3), |(r, c, ch)| (r * 100 + c * 10 + ch) as f64);
        let padded = pad_symmetric(&array, 1);
        assert_eq!(padded.dim(), (4, 4, 3));
        // Corner mirrors the original top-left pixel in every channel
        for ch in 0..3 {
            assert_eq!(padded[[0, 0, ch]], array[[0, 0, ch]]);
            assert_eq!(padded[[3, 3, ch]], array[[1, 1, ch]]);
        }
    }

    #[test]
    fn test_zero_pad_is_a_copy() {
        let array = Array3::from_elem((2, 3, 1), 7.0);
        assert_eq!(pad_symmetric(&array, 0), array);
    }
}
