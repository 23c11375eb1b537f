use crate::utils::scale_to_u8;
use alloc::vec::Vec;
use snafu::{ensure, Snafu};

#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum LevelsError {
    #[snafu(display("A level table needs at least one level"))]
    Empty,
    #[snafu(display("Unsupported level count {count}, expected 2..=256"))]
    UnsupportedCount { count: usize },
    #[snafu(display(
        "Thresholds must be strictly decreasing, but level {index} has threshold {threshold} after {previous}"
    ))]
    UnorderedThresholds {
        index: usize,
        threshold: f32,
        previous: f32,
    },
}

/// One output level of a quantizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    /// A pending value strictly greater than this selects the level.
    pub threshold: f32,
    /// The quantized value in `0.0..=1.0`. Residual error is measured against this.
    pub value: f32,
    /// What ends up in the output grid: a display byte or a bin index.
    pub code: u8,
}

/// An ordered table of levels, highest threshold first.
///
/// The last level is the floor: it is selected whenever no threshold is exceeded, including for
/// negative pending values. Values above `1.0` select the first level. This clamping is part of the
/// mapping, not error recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizationLevels {
    levels: Vec<Level>,
}

impl QuantizationLevels {
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelsError> {
        ensure!(!levels.is_empty(), levels_error::EmptySnafu);

        for (index, pair) in levels.windows(2).enumerate() {
            let (previous, threshold) = (pair[0].threshold, pair[1].threshold);
            ensure!(
                threshold < previous,
                levels_error::UnorderedThresholdsSnafu {
                    index: index + 1,
                    threshold,
                    previous,
                }
            );
        }

        Ok(Self { levels })
    }

    /// The four-level grey palette: `0xFF, 0xAA, 0x55, 0x00`.
    pub fn display_grey4() -> Self {
        Self::uniform(4, |j, k| scale_to_u8(j, k - 1))
    }

    /// `count` equal-width bins over `0.0..=1.0`, coded as 8-bit grey values.
    pub fn uniform_display(count: usize) -> Result<Self, LevelsError> {
        Self::check_count(count)?;
        Ok(Self::uniform(count as u32, |j, k| scale_to_u8(j, k - 1)))
    }

    /// `2^bits` equal-width bins over `0.0..=1.0`, coded by bin index (`0` is darkest).
    pub fn indexed(bits: u32) -> Result<Self, LevelsError> {
        let count = 1usize.checked_shl(bits).unwrap_or(0);
        ensure!(
            bits >= 1 && bits <= 8,
            levels_error::UnsupportedCountSnafu { count }
        );
        Ok(Self::uniform(count as u32, |j, _| j as u8))
    }

    fn check_count(count: usize) -> Result<(), LevelsError> {
        ensure!(
            (2..=256).contains(&count),
            levels_error::UnsupportedCountSnafu { count }
        );
        Ok(())
    }

    /// Bin `i` (counted from the top) covers `((k-1-i)/k, (k-i)/k]` and quantizes to
    /// `(k-1-i)/(k-1)`.
    fn uniform(k: u32, code: impl Fn(u32, u32) -> u8) -> Self {
        let levels = (0..k)
            .rev()
            .map(|j| Level {
                threshold: j as f32 / k as f32,
                value: j as f32 / (k - 1) as f32,
                code: code(j, k),
            })
            .collect();

        Self { levels }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Level] {
        &self.levels
    }

    /// Codes in table order.
    pub fn codes(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.iter().map(|level| level.code)
    }

    /// Selects the level for a pending value. The first level whose threshold is exceeded wins.
    #[inline]
    pub fn select(&self, value: f32) -> &Level {
        // construction guarantees at least one level
        let (rest, floor) = self.levels.split_at(self.levels.len() - 1);

        rest.iter()
            .find(|level| value > level.threshold)
            .unwrap_or(&floor[0])
    }
}
