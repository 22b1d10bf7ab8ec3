//! Kernel structure for averaging pixels around a centre
//!
//! A kernel of radius `k` covers the square of side `2k + 1` centred on a
//! pixel. A hollow kernel keeps only the outer ring of that square (pixels
//! at Chebyshev distance exactly `k`); a solid kernel keeps every pixel in
//! the square. Coordinates are in padded stack space, so a centre is always
//! at least `k` pixels away from the array border.

use ndarray::{s, Array3};

/// Square averaging kernel around a centre pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// Distance from the centre to the kernel's outer ring
    pub radius: usize,

    /// Whether the interior of the square is included
    pub solid: bool,
}

impl Kernel {
    /// Create a new kernel
    ///
    /// # Arguments
    /// * `radius` - Distance from the centre to the outer ring, at least 1
    /// * `solid` - Include the interior instead of just the ring
    pub fn new(radius: usize, solid: bool) -> Self {
        Kernel { radius, solid }
    }

    /// Side length of the square the kernel spans
    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Number of pixels the kernel averages over
    pub fn area(&self) -> usize {
        if self.solid || self.radius == 0 {
            self.side() * self.side()
        } else {
            // Outer ring only
            self.side() * self.side() - (self.side() - 2) * (self.side() - 2)
        }
    }

    /// Check whether an offset from the centre belongs to the kernel
    pub fn contains(&self, dx: usize, dy: usize) -> bool {
        let distance = dx.max(dy);
        if self.solid {
            distance <= self.radius
        } else {
            distance == self.radius
        }
    }

    /// Per-channel mean of the kernel's pixels around a padded-space centre
    ///
    /// # Arguments
    /// * `layer` - Padded layer shaped `(height, width, channels)`
    /// * `center_x` - Column of the centre in padded space
    /// * `center_y` - Row of the centre in padded space
    ///
    /// # Returns
    /// One mean per channel
    pub fn channel_means(&self, layer: &Array3<f64>, center_x: usize, center_y: usize) -> Vec<f64> {
        let start_x = center_x - self.radius;
        let start_y = center_y - self.radius;
        let window = layer.slice(s![start_y..start_y + self.side(), start_x..start_x + self.side(), ..]);

        let channels = layer.dim().2;
        let mut sums = vec![0.0; channels];

        for ((row, col, channel), value) in window.indexed_iter() {
            if self.contains(row.abs_diff(self.radius), col.abs_diff(self.radius)) {
                sums[channel] += *value;
            }
        }

        let area = self.area() as f64;
        sums.into_iter().map(|sum| sum / area).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area() {
        assert_eq!(Kernel::new(1, true).area(), 9);
        assert_eq!(Kernel::new(1, false).area(), 8);
        assert_eq!(Kernel::new(2, false).area(), 16);
    }

    #[test]
    fn test_hollow_kernel_skips_centre() {
        // 3x3 single channel, centre holds a large value that must be ignored
        let mut layer = Array3::from_elem((3, 3, 1), 1.0);
        layer[[1, 1, 0]] = 100.0;

        let ring = Kernel::new(1, false).channel_means(&layer, 1, 1);
        assert_eq!(ring, vec![1.0]);

        let solid = Kernel::new(1, true).channel_means(&layer, 1, 1);
        assert!((solid[0] - 108.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_means_are_per_channel() {
        let layer = Array3::from_shape_fn((5, 5, 2), |(_, _, ch)| if ch == 0 { 0.25 } else { 0.75 });
        let means = Kernel::new(2, false).channel_means(&layer, 2, 2);
        assert_eq!(means, vec![0.25, 0.75]);
    }
}
