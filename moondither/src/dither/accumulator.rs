use super::kernel::Kernel;
use crate::grid::Grid;
use alloc::{vec, vec::Vec};

/// Pending values of one dithering pass: the normalized sample plus all error diffused into it.
///
/// The buffer is padded by the kernel's reach: columns on both sides and rows below the image.
/// Diffusion that leaves the image lands in the padding and is never read, so nothing wraps to
/// the opposite edge. Pixels must be consumed in raster order; once a row has been consumed its
/// entries aren't touched again.
#[derive(Debug, Clone)]
pub struct ErrorAccumulator {
    width: usize,
    height: usize,
    pad_left: usize,
    stride: usize,
    kernel: Kernel,
    buf: Vec<f32>,
    cursor: Option<(usize, usize)>,
}

impl ErrorAccumulator {
    /// Zeroes a padded buffer sized for `kernel` and seeds the image region with `values`.
    pub fn new(values: &Grid<f32>, kernel: Kernel) -> Self {
        let (width, height) = (values.width(), values.height());
        let pad_left = kernel.reach_left();
        let stride = pad_left + width + kernel.reach_right();
        let rows = height + kernel.reach_down();

        let mut buf = vec![0.0; stride * rows];
        if width > 0 {
            for (dst, src) in buf.chunks_exact_mut(stride).zip(values.rows()) {
                dst[pad_left..pad_left + width].copy_from_slice(src);
            }
        }

        Self {
            width,
            height,
            pad_left,
            stride,
            kernel,
            buf,
            cursor: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Reads the pending value at `(x, y)` and marks it consumed.
    ///
    /// # Panics
    ///
    /// In debug builds, if `(x, y)` isn't strictly after the previously consumed pixel in raster
    /// order.
    #[inline]
    pub fn take(&mut self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        debug_assert!(
            self.cursor.map_or(true, |(cx, cy)| (y, x) > (cy, cx)),
            "pixel ({x}, {y}) consumed out of raster order after {:?}",
            self.cursor
        );
        self.cursor = Some((x, y));

        self.buf[y * self.stride + self.pad_left + x]
    }

    /// Spreads `error` from `(x, y)` over the kernel's neighbours.
    #[inline]
    pub fn diffuse(&mut self, x: usize, y: usize, error: f32) {
        let divisor = f32::from(self.kernel.divisor);
        for &(dx, dy, weight) in self.kernel.entries {
            // Padding covers the kernel's reach, so the column never underflows.
            let col = (self.pad_left + x).wrapping_add_signed(dx as isize);
            let row = y + dy as usize;
            self.buf[row * self.stride + col] += error * f32::from(weight) / divisor;
        }
    }

    /// Pending values of row `y`, without the padding columns. `y` may address the padding rows
    /// below the image.
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride + self.pad_left;
        &self.buf[start..start + self.width]
    }
}
