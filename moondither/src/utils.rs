/// Largest value representable in `bits` bits. `bits` must be in `1..=32`.
#[inline]
pub const fn max_value(bits: u32) -> u32 {
    u32::MAX >> (32 - bits)
}

/// Integer division rounding towards positive infinity.
#[inline]
pub const fn ceil_div(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

/// Scales `numerator / denominator` onto `0..=255`, rounding half up. Integer only, so it is
/// usable without `std`.
#[inline]
pub const fn scale_to_u8(numerator: u32, denominator: u32) -> u8 {
    ((numerator * 255 * 2 + denominator) / (denominator * 2)) as u8
}

/// Iterator over the coordinates of a `width × height` grid in raster order: left to right, top
/// to bottom.
///
/// Every `(x, y)` yielded is strictly after the previous one in that order. Error diffusion relies
/// on this: each pixel consumes error from pixels visited before it.
#[derive(Debug, Clone)]
pub struct RasterOrder {
    width: usize,
    height: usize,
    x: usize,
    y: usize,
}

impl RasterOrder {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
        }
    }
}

impl Iterator for RasterOrder {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.width == 0 || self.y >= self.height {
            return None;
        }

        let item = (self.x, self.y);
        self.x += 1;
        if self.x == self.width {
            self.x = 0;
            self.y += 1;
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.width == 0 || self.y >= self.height {
            0
        } else {
            (self.height - self.y) * self.width - self.x
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RasterOrder {}
