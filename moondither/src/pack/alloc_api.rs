use super::{pack, PackError, PackLayout};
use crate::grid::Grid;
use alloc::vec::Vec;

/// Packs one row of codes, `values_per_word` at a time. The last word may be short.
///
/// On [`PackError::ValueOutOfRange`] the reported index is the column within the row.
pub fn pack_row(row: &[u8], layout: PackLayout) -> Result<Vec<u32>, PackError> {
    let per_word = layout.values_per_word() as usize;
    let mut chunk = Vec::with_capacity(per_word);

    row.chunks(per_word)
        .enumerate()
        .map(|(i, codes)| {
            chunk.clear();
            chunk.extend(codes.iter().map(|&code| i64::from(code)));

            pack(&chunk, layout).map_err(|e| match e {
                PackError::ValueOutOfRange { value, index, max } => PackError::ValueOutOfRange {
                    value,
                    index: i * per_word + index,
                    max,
                },
                e => e,
            })
        })
        .collect()
}

/// Packs every row of `codes`. Each row yields `ceil(width / values_per_word)` words.
pub fn pack_rows(codes: &Grid<u8>, layout: PackLayout) -> Result<Vec<Vec<u32>>, PackError> {
    let rows = codes
        .rows()
        .map(|row| pack_row(row, layout))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "packed {}x{} codes into {} words per row",
        codes.width(),
        codes.height(),
        rows.first().map_or(0, Vec::len)
    );

    Ok(rows)
}
