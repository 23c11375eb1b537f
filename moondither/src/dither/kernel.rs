/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: the neighbour at `(x + dx, y + dy)` receives
/// `error * weight / divisor`. Entries must only reach pixels that are visited later in raster
/// order, i.e. `dy > 0`, or `dy == 0` and `dx > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
}

/// Floyd-Steinberg: 4 neighbours, 100% of the error.
///
/// ```plain
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // below left
        (0, 1, 5),  // below
        (1, 1, 1),  // below right
    ],
    divisor: 16,
};

/// Atkinson: 6 neighbours, 75% of the error.
///
/// ```plain
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
};

/// No diffusion at all: plain threshold quantization.
pub const NONE: Kernel = Kernel {
    entries: &[],
    divisor: 1,
};

impl Kernel {
    /// Columns reached to the left of the current pixel.
    pub fn reach_left(&self) -> usize {
        self.entries
            .iter()
            .map(|&(dx, _, _)| (-dx).max(0) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Columns reached to the right of the current pixel.
    pub fn reach_right(&self) -> usize {
        self.entries
            .iter()
            .map(|&(dx, _, _)| dx.max(0) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Rows reached below the current pixel.
    pub fn reach_down(&self) -> usize {
        self.entries
            .iter()
            .map(|&(_, dy, _)| dy.max(0) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Whether every entry points strictly forward in raster order.
    pub fn is_causal(&self) -> bool {
        self.entries
            .iter()
            .all(|&(dx, dy, _)| dy > 0 || (dy == 0 && dx > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reach() {
        assert_eq!(
            (
                FLOYD_STEINBERG.reach_left(),
                FLOYD_STEINBERG.reach_right(),
                FLOYD_STEINBERG.reach_down()
            ),
            (1, 1, 1)
        );
        assert_eq!(
            (ATKINSON.reach_left(), ATKINSON.reach_right(), ATKINSON.reach_down()),
            (1, 2, 2)
        );
        assert_eq!((NONE.reach_left(), NONE.reach_right(), NONE.reach_down()), (0, 0, 0));
    }

    #[test]
    fn builtin_kernels_are_causal() {
        assert!(FLOYD_STEINBERG.is_causal());
        assert!(ATKINSON.is_causal());
        assert!(NONE.is_causal());

        let backwards = Kernel {
            entries: &[(-1, 0, 1)],
            divisor: 1,
        };
        assert!(!backwards.is_causal());
    }

    #[test]
    fn floyd_steinberg_propagates_everything() {
        let total: u32 = FLOYD_STEINBERG.entries.iter().map(|&(_, _, w)| u32::from(w)).sum();
        assert_eq!(total, u32::from(FLOYD_STEINBERG.divisor));
    }
}
