use crate::{
    consts::MIN_VALUE,
    grid::Grid,
    levels::{LevelsError, QuantizationLevels},
};
use alloc::vec::Vec;
use snafu::{ensure, ResultExt, Snafu};

mod accumulator;
pub mod kernel;

pub use accumulator::ErrorAccumulator;
pub use kernel::Kernel;

#[derive(Debug, Snafu)]
pub enum DitherError {
    #[snafu(display("Kernel diffuses error to already visited pixels: {kernel:?}"))]
    NonCausalKernel { kernel: Kernel },
    #[snafu(display("Kernel divisor must not be zero"))]
    ZeroDivisor,
    #[snafu(display("Invalid level table: {source}"))]
    InvalidLevels { source: LevelsError },
}

/// How output codes relate to the reserved "no data" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Codes are emitted as selected. Used for display output, where black is `0`.
    Allow,
    /// Codes are clamped to at least `min_code`, keeping the values below it free to mean
    /// "no data".
    ReserveZero { min_code: u8 },
}

impl ZeroPolicy {
    /// Reserves [`NO_VALUE`](crate::consts::NO_VALUE) with the smallest real code being
    /// [`MIN_VALUE`].
    pub const RESERVE_NO_VALUE: ZeroPolicy = ZeroPolicy::ReserveZero {
        min_code: MIN_VALUE,
    };

    #[inline]
    pub fn apply(self, code: u8) -> u8 {
        match self {
            ZeroPolicy::Allow => code,
            ZeroPolicy::ReserveZero { min_code } => code.max(min_code),
        }
    }
}

/// Everything a dithering pass needs: the level table, the diffusion kernel and the zero policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DitherConfig {
    levels: QuantizationLevels,
    kernel: Kernel,
    zero_policy: ZeroPolicy,
}

impl DitherConfig {
    pub fn new(
        levels: QuantizationLevels,
        kernel: Kernel,
        zero_policy: ZeroPolicy,
    ) -> Result<Self, DitherError> {
        ensure!(kernel.divisor != 0, ZeroDivisorSnafu);
        ensure!(kernel.is_causal(), NonCausalKernelSnafu { kernel });

        Ok(Self {
            levels,
            kernel,
            zero_policy,
        })
    }

    /// Four grey levels, Floyd-Steinberg diffusion, `0` is plain black.
    pub fn display() -> Self {
        Self {
            levels: QuantizationLevels::display_grey4(),
            kernel: kernel::FLOYD_STEINBERG,
            zero_policy: ZeroPolicy::Allow,
        }
    }

    /// `2^bits` indexed levels without diffusion, `0` reserved for "no data".
    pub fn embedding(bits: u32) -> Result<Self, DitherError> {
        let levels = QuantizationLevels::indexed(bits).context(InvalidLevelsSnafu)?;

        Ok(Self {
            levels,
            kernel: kernel::NONE,
            zero_policy: ZeroPolicy::RESERVE_NO_VALUE,
        })
    }

    /// Replaces the diffusion kernel.
    pub fn with_kernel(self, kernel: Kernel) -> Result<Self, DitherError> {
        Self::new(self.levels, kernel, self.zero_policy)
    }

    #[inline]
    pub fn levels(&self) -> &QuantizationLevels {
        &self.levels
    }

    #[inline]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    #[inline]
    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }

    /// Every code a pass with this configuration can emit.
    pub fn output_codes(&self) -> Vec<u8> {
        let mut codes: Vec<u8> = self
            .levels
            .codes()
            .map(|code| self.zero_policy.apply(code))
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self::display()
    }
}

/// Quantizes normalized grids with error diffusion.
#[derive(Debug, Clone)]
pub struct Ditherer {
    config: DitherConfig,
}

impl Ditherer {
    pub fn new(config: DitherConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &DitherConfig {
        &self.config
    }

    /// Dithers `values` into a grid of level codes.
    ///
    /// A fresh [`ErrorAccumulator`] is created for the pass and dropped afterwards, so separate
    /// calls share no state.
    pub fn dither(&self, values: &Grid<f32>) -> Grid<u8> {
        let mut acc = self.accumulator(values);

        let grid = Grid::from_fn(values.width(), values.height(), |(x, y)| {
            self.quantize_pixel(&mut acc, x, y)
        });

        log::debug!(
            "dithered {}x{} grid to {} levels ({} kernel taps)",
            values.width(),
            values.height(),
            self.config.levels.len(),
            self.config.kernel.entries.len()
        );

        grid
    }

    /// Seeds an [`ErrorAccumulator`] for a pass driven by [`Ditherer::quantize_pixel`] or
    /// [`Ditherer::quantize_row`], using the configured kernel.
    pub fn accumulator(&self, values: &Grid<f32>) -> ErrorAccumulator {
        ErrorAccumulator::new(values, self.config.kernel)
    }

    /// One step of the pass: consumes the pending value at `(x, y)`, selects its level, diffuses
    /// the residual and returns the code.
    ///
    /// Calls must follow raster order, as [`RasterOrder`](crate::utils::RasterOrder) yields it,
    /// and `acc` must come from [`Ditherer::accumulator`] (debug builds check the kernel).
    #[inline]
    pub fn quantize_pixel(&self, acc: &mut ErrorAccumulator, x: usize, y: usize) -> u8 {
        debug_assert_eq!(
            acc.kernel(),
            self.config.kernel,
            "accumulator kernel differs from the configured kernel"
        );
        let pending = acc.take(x, y);
        let level = self.config.levels.select(pending);

        acc.diffuse(x, y, pending - level.value);

        self.config.zero_policy.apply(level.code)
    }

    /// Runs every pixel of row `y` through [`Ditherer::quantize_pixel`].
    pub fn quantize_row(&self, acc: &mut ErrorAccumulator, y: usize) -> Vec<u8> {
        (0..acc.width())
            .map(|x| self.quantize_pixel(acc, x, y))
            .collect()
    }
}

/// Dithers `values` with `config`. See [`Ditherer::dither`].
pub fn dither(values: &Grid<f32>, config: &DitherConfig) -> Grid<u8> {
    Ditherer::new(config.clone()).dither(values)
}
