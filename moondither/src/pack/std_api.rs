use byteorder::{ByteOrder, WriteBytesExt};
use itertools::Itertools;
use snafu::{ResultExt, Snafu};
use std::io::Write;

#[derive(Debug, Snafu)]
pub enum EmitError {
    WriteIo { source: std::io::Error },
}

/// Writes packed rows as a nested JSON array, one row per line:
///
/// ```plain
/// [
/// [1,2,3],
/// [4,5,6]
/// ]
/// ```
pub fn write_json<W: Write>(rows: &[Vec<u32>], mut w: W) -> Result<(), EmitError> {
    let body = rows
        .iter()
        .format_with(",\n", |row, f| f(&format_args!("[{}]", row.iter().format(","))));

    writeln!(w, "[\n{body}\n]").context(WriteIoSnafu)
}

/// Writes every word of every row as a raw 32-bit integer in byte order `B`, row after row.
pub fn write_words<B: ByteOrder, W: Write>(rows: &[Vec<u32>], mut w: W) -> Result<(), EmitError> {
    for &word in rows.iter().flatten() {
        w.write_u32::<B>(word).context(WriteIoSnafu)?;
    }

    Ok(())
}
