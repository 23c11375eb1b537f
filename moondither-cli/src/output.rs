use crate::BoxError;
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder, RgbaImage};
use std::{
    io::{BufWriter, Write},
    path::Path,
};
use tempfile::NamedTempFile;

/// Writes `contents` next to `path` and moves it into place once complete, so a failed run never
/// leaves a partial file behind.
pub fn write_atomic(
    path: &Path,
    contents: impl FnOnce(&mut dyn Write) -> Result<(), BoxError>,
) -> Result<(), BoxError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        contents(&mut w)?;
        w.flush()?;
    }
    tmp.persist(path)?;

    Ok(())
}

pub fn save_png(path: &Path, img: &RgbaImage) -> Result<(), BoxError> {
    write_atomic(path, |w| {
        PngEncoder::new(w).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;
        Ok(())
    })
}
