#[cfg(feature = "alloc")]
use crate::{consts::OPAQUE, grid::Grid};
use crate::utils::RasterOrder;

/// A disk of `radius` pixels centred on a `width × height` image.
///
/// A pixel is inside when its centre lies strictly within the disk:
///
/// ```plain
/// (x + 0.5 - W/2)² + (y + 0.5 - H/2)² < radius²
/// ```
///
/// A radius of zero or less (or NaN) leaves every pixel outside. Shrinking the radius never moves
/// a pixel from outside to inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApertureMask {
    width: usize,
    height: usize,
    radius: f64,
}

impl ApertureMask {
    pub const fn new(width: usize, height: usize, radius: f64) -> Self {
        Self {
            width,
            height,
            radius,
        }
    }

    /// The largest disk that fits the image: `radius = min(W, H) / 2`.
    pub fn inscribed(width: usize, height: usize) -> Self {
        Self::new(width, height, width.min(height) as f64 / 2.0)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        if self.radius.is_nan() || self.radius <= 0.0 {
            return false;
        }

        let dx = x as f64 + 0.5 - self.width as f64 / 2.0;
        let dy = y as f64 + 0.5 - self.height as f64 / 2.0;
        dx * dx + dy * dy < self.radius * self.radius
    }

    /// Inside/outside for every pixel, in raster order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        RasterOrder::new(self.width, self.height).map(|(x, y)| self.contains(x, y))
    }

    /// Turns a grid of grey codes into RGBA: `(c, c, c, 0xFF)` inside, `(0, 0, 0, 0)` outside.
    #[cfg(feature = "alloc")]
    pub fn apply_rgba(&self, codes: &Grid<u8>) -> Grid<[u8; 4]> {
        debug_assert_eq!((codes.width(), codes.height()), (self.width, self.height));

        let mut inside = 0usize;
        let masked = Grid::from_fn(codes.width(), codes.height(), |(x, y)| {
            if self.contains(x, y) {
                inside += 1;
                let c = codes[(x, y)];
                [c, c, c, OPAQUE]
            } else {
                [0; 4]
            }
        });

        log::debug!(
            "masked {}x{} grid with radius {}: {inside} pixels inside",
            codes.width(),
            codes.height(),
            self.radius
        );

        masked
    }

    /// Replaces every code outside the disk with `sentinel`.
    #[cfg(feature = "alloc")]
    pub fn apply_sentinel(&self, codes: &Grid<u8>, sentinel: u8) -> Grid<u8> {
        debug_assert_eq!((codes.width(), codes.height()), (self.width, self.height));

        Grid::from_fn(codes.width(), codes.height(), |(x, y)| {
            if self.contains(x, y) {
                codes[(x, y)]
            } else {
                sentinel
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_pixels_of_even_grid() {
        let mask = ApertureMask::new(4, 4, 1.0);
        let inside: Vec<_> = RasterOrder::new(4, 4)
            .filter(|&(x, y)| mask.contains(x, y))
            .collect();
        assert_eq!(inside, [(1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn strict_boundary() {
        // centre of pixel (1, 0) is exactly 0.5 right of the image centre
        let mask = ApertureMask::new(2, 1, 0.5);
        assert!(!mask.contains(1, 0));
        assert!(ApertureMask::new(2, 1, 0.5001).contains(1, 0));
    }

    #[test]
    fn non_positive_radius_is_empty() {
        for radius in [0.0, -1.0, f64::NAN] {
            assert!(ApertureMask::new(3, 3, radius).iter().all(|inside| !inside));
        }
    }
}
