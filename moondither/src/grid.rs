use crate::utils::RasterOrder;
use alloc::vec::Vec;
use snafu::{ensure, Snafu};

#[derive(Debug, Snafu)]
pub enum GridError {
    #[snafu(display(
        "Specified grid dimensions don't match the number of samples: {width} * {height} == {} samples, but {sample_count} samples were given",
        width * height
    ))]
    InvalidDimensions {
        width: usize,
        height: usize,
        sample_count: usize,
    },
}

/// A row-major `width × height` raster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    samples: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_vec(width: usize, height: usize, samples: Vec<T>) -> Result<Self, GridError> {
        ensure!(
            width * height == samples.len(),
            InvalidDimensionsSnafu {
                width,
                height,
                sample_count: samples.len()
            }
        );

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Builds a grid by evaluating `f(x, y)` in raster order.
    pub fn from_fn(width: usize, height: usize, f: impl FnMut((usize, usize)) -> T) -> Self {
        Self {
            width,
            height,
            samples: RasterOrder::new(width, height).map(f).collect(),
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
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.samples.get(y * self.width + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<T> {
        self.samples
    }

    /// Rows from top to bottom. Always yields `height` rows, empty ones for a zero-width grid.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.height).map(move |y| &self.samples[y * self.width..(y + 1) * self.width])
    }

    /// Samples paired with their coordinates, in raster order.
    pub fn enumerate(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        RasterOrder::new(self.width, self.height).zip(self.samples.iter())
    }

    /// Applies `f` to every sample, keeping the dimensions.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            samples: self.samples.iter().map(f).collect(),
        }
    }
}

impl<T> core::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(x < self.width, "x out of bounds: {x} >= {}", self.width);
        &self.samples[y * self.width + x]
    }
}
