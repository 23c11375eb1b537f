use crate::grid::Grid;
use snafu::{ensure, OptionExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum NormalizeError {
    #[snafu(display("White point is zero, samples can't be normalized"))]
    DivisionByZero,
}

/// Largest sample of the grid, or `None` for an empty grid.
pub fn max_sample(grid: &Grid<u16>) -> Option<u16> {
    grid.as_slice().iter().copied().max()
}

/// Rescales `grid` onto `0.0..=1.0`, treating `white_point` as full brightness.
///
/// Without an explicit white point the brightest sample of the grid is used. A white point of
/// zero (including the maximum of an all-black or empty grid) is an error: nothing is substituted.
pub fn normalize(grid: &Grid<u16>, white_point: Option<u16>) -> Result<Grid<f32>, NormalizeError> {
    let white = match white_point {
        Some(white) => white,
        None => max_sample(grid).context(normalize_error::DivisionByZeroSnafu)?,
    };
    ensure!(white != 0, normalize_error::DivisionByZeroSnafu);

    let white = f64::from(white);
    let normalized = grid.map(|&raw| (f64::from(raw) / white) as f32);

    log::debug!(
        "normalized {}x{} grid against white point {white}",
        grid.width(),
        grid.height()
    );

    Ok(normalized)
}
