//! Fixed-width bit packing.
//!
//! Up to `values_per_word` values of `bits_per_value` bits each are packed into one 32-bit word,
//! the first value in the least significant bits:
//!
//! ```plain
//! .- PackLayout::EMBEDDING (6 bits x 5 values) ------------------.
//! | 31 30 | 29 .. 24 | 23 .. 18 | 17 .. 12 | 11 .. 6  |  5 .. 0  |
//! |-------+----------+----------+----------+----------+----------|
//! |  0  0 | value[4] | value[3] | value[2] | value[1] | value[0] |
//! `--------------------------------------------------------------`
//! ```
//!
//! Bits above the last packed value are zero, so a short final chunk of a row only occupies the
//! low bits. The default layout leaves the top two bits clear, so a consumer reading the words
//! as signed 32-bit integers never sees a negative number.

use crate::{
    consts::{BITS_PER_PIXEL, PIXELS_PER_WORD},
    utils::max_value,
};
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
pub use alloc_api::*;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Snafu)]
pub enum PackError {
    #[snafu(display(
        "Invalid pack layout: {values_per_word} values of {bits_per_value} bits don't fit a 32-bit word"
    ))]
    InvalidLayout {
        bits_per_value: u32,
        values_per_word: u32,
    },
    #[snafu(display("Too many values: {count} given, but a word holds at most {capacity}"))]
    TooManyValues { count: usize, capacity: u32 },
    #[snafu(display("Unexpected value {value} at index {index}, expected 0..={max}"))]
    ValueOutOfRange { value: i64, index: usize, max: u32 },
}

/// Bits per value and values per word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackLayout {
    bits_per_value: u32,
    values_per_word: u32,
}

impl PackLayout {
    /// 5 values of 6 bits: 30 bits per word.
    pub const EMBEDDING: PackLayout = PackLayout {
        bits_per_value: BITS_PER_PIXEL,
        values_per_word: PIXELS_PER_WORD,
    };

    pub fn new(bits_per_value: u32, values_per_word: u32) -> Result<Self, PackError> {
        ensure!(
            bits_per_value >= 1
                && values_per_word >= 1
                && bits_per_value
                    .checked_mul(values_per_word)
                    .map_or(false, |bits| bits <= u32::BITS),
            InvalidLayoutSnafu {
                bits_per_value,
                values_per_word
            }
        );

        Ok(Self {
            bits_per_value,
            values_per_word,
        })
    }

    #[inline]
    pub const fn bits_per_value(&self) -> u32 {
        self.bits_per_value
    }

    #[inline]
    pub const fn values_per_word(&self) -> u32 {
        self.values_per_word
    }

    /// Largest value that fits: `2^bits_per_value - 1`.
    #[inline]
    pub const fn max_value(&self) -> u32 {
        max_value(self.bits_per_value)
    }
}

impl Default for PackLayout {
    fn default() -> Self {
        Self::EMBEDDING
    }
}

/// Packs `values` into one word, the first value ending up in the least significant bits.
///
/// Fails if more than `values_per_word` values are given, or if any value is outside
/// `0..=2^bits_per_value - 1`. Values are never clamped. Inputs are `i64` so that every value of a
/// 32-bit slot is representable alongside the negative ones that get rejected.
pub fn pack(values: &[i64], layout: PackLayout) -> Result<u32, PackError> {
    ensure!(
        values.len() <= layout.values_per_word as usize,
        TooManyValuesSnafu {
            count: values.len(),
            capacity: layout.values_per_word
        }
    );

    let max = layout.max_value();
    for (index, &value) in values.iter().enumerate() {
        ensure!(
            u32::try_from(value).map_or(false, |v| v <= max),
            ValueOutOfRangeSnafu { value, index, max }
        );
    }

    // u64 so that a single 32-bit value can be shifted in without overflowing
    let word = values.iter().rev().fold(0u64, |acc, &value| {
        (acc << layout.bits_per_value) | value as u32 as u64
    });

    Ok(word as u32)
}

/// Extracts all `values_per_word` values of `word`, least significant first.
///
/// Unused high slots of a short chunk come back as `0`.
pub fn unpack(word: u32, layout: PackLayout) -> Unpacked {
    Unpacked {
        word,
        bits: layout.bits_per_value,
        mask: layout.max_value(),
        remaining: layout.values_per_word,
    }
}

/// Iterator returned by [`unpack`].
#[derive(Debug, Clone)]
pub struct Unpacked {
    word: u32,
    bits: u32,
    mask: u32,
    remaining: u32,
}

impl Iterator for Unpacked {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let value = self.word & self.mask;
        self.word = self.word.checked_shr(self.bits).unwrap_or(0);

        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Unpacked {}
