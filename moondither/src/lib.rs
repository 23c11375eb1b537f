//! Greyscale error-diffusion dithering, disk masking and fixed-width bit packing.
//!
//! `moondither` prepares a single greyscale photograph for a low bit-depth display: samples are
//! normalized against a white point, quantized to a small set of levels while the rounding error
//! is diffused onto not-yet-visited neighbours, and finally cut to a circular aperture. A companion
//! path packs the quantized values into dense 32-bit words so they can be embedded as literal data.
//!
//! # Pipeline
//!
//! ```plain
//! Grid<u16>  --normalize-->  Grid<f32>  --dither-->  Grid<u8>  --mask-->  Grid<[u8; 4]>  (RGBA)
//!                                                        |
//!                                                        `--mask (NO_VALUE)--> pack --> [[u32]]
//! ```
//!
//! # Display path
//!
//! The display configuration ([`DitherConfig::display`]) uses four grey levels and the
//! Floyd-Steinberg kernel:
//!
//! ```plain
//! .- thresholds ----------------------------.
//! | pending value v |  level  |    code     |
//! |-----------------+---------+-------------|
//! |  v > 3/4        |   1     |    0xFF     |
//! |  v > 1/2        |   2/3   |    0xAA     |
//! |  v > 1/4        |   1/3   |    0x55     |
//! |  otherwise      |   0     |    0x00     |
//! `-----------------------------------------`
//!
//! .- Floyd-Steinberg ---.
//! |        X    7/16    |
//! | 3/16  5/16  1/16    |
//! `---------------------`
//! ```
//!
//! Pixels are visited in strict raster order. Every pixel's pending value depends on error
//! diffused from pixels above it and to its left, so a single pass can't be split into rows or
//! tiles. Independent images can be processed in parallel, each pass owns its own
//! [`ErrorAccumulator`](dither::ErrorAccumulator).
//!
//! # Embedding path
//!
//! The embedding configuration ([`DitherConfig::embedding`]) quantizes to `2^bits` equal-width
//! bins without diffusion and never produces [`NO_VALUE`](consts::NO_VALUE) for a real pixel, so
//! that `0` can mark "no data" outside the aperture. See [`pack`] for the word layout.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
pub mod dither;
#[cfg(feature = "alloc")]
pub mod grid;
#[cfg(feature = "alloc")]
pub mod levels;
#[cfg(feature = "alloc")]
pub mod normalize;

pub mod mask;
pub mod pack;
pub mod utils;

#[cfg(feature = "alloc")]
pub use dither::{dither, DitherConfig, DitherError, Ditherer, ZeroPolicy};
#[cfg(feature = "alloc")]
pub use grid::{Grid, GridError};
#[cfg(feature = "alloc")]
pub use levels::{Level, QuantizationLevels};
#[cfg(feature = "alloc")]
pub use normalize::{normalize, NormalizeError};

pub use mask::ApertureMask;
pub use pack::{pack, unpack, PackError, PackLayout};

pub mod consts {
    /// Bits used for one value in the default embedding layout.
    pub const BITS_PER_PIXEL: u32 = 6;

    /// Values packed into one word in the default embedding layout.
    ///
    /// 5 × 6 = 30 bits, so the sign bit of a signed 32-bit consumer is never touched.
    pub const PIXELS_PER_WORD: u32 = 5;

    /// Reserved code meaning "no data". Only ever produced outside the aperture.
    pub const NO_VALUE: u8 = 0;

    /// Smallest code a real pixel may carry when [`NO_VALUE`] is reserved.
    pub const MIN_VALUE: u8 = 1;

    /// Alpha of a pixel inside the aperture.
    pub const OPAQUE: u8 = 0xFF;

    /// Grey codes of the four-level display palette, brightest first.
    pub const GREY4_CODES: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

    /// Default disk radius (in output pixels) for rendered frames.
    pub const DEFAULT_RADIUS: u32 = 35;

    /// Default number of rotation steps covering 90°.
    pub const DEFAULT_STEPS: u32 = 50;

    /// Pixels trimmed from each edge of the source before rotating.
    pub const CROP_PIXELS: u32 = 2;

    /// Disk radius of the launcher icon.
    pub const ICON_RADIUS: u32 = 20;
}
