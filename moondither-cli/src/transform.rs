use image::{imageops, imageops::FilterType, GrayImage, Luma, RgbaImage};
use moondither::Grid;

/// Trims `pixels` from every edge.
pub fn crop_edges(img: &GrayImage, pixels: u32) -> Result<GrayImage, &'static str> {
    let (width, height) = img.dimensions();
    if width <= 2 * pixels || height <= 2 * pixels {
        return Err("crop would remove the whole image");
    }

    Ok(imageops::crop_imm(img, pixels, pixels, width - 2 * pixels, height - 2 * pixels).to_image())
}

/// Rotates clockwise by `degrees` around the image centre. Pixels that come from outside the
/// source are black.
pub fn rotate_clockwise(img: &GrayImage, degrees: f32) -> GrayImage {
    if degrees == 0.0 {
        return img.clone();
    }

    let (width, height) = img.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);

    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        // inverse mapping: find where the output pixel centre came from
        let sx = dx * cos + dy * sin + cx - 0.5;
        let sy = -dx * sin + dy * cos + cy - 0.5;

        Luma([sample_bilinear(img, sx, sy)])
    })
}

fn sample_bilinear(img: &GrayImage, sx: f32, sy: f32) -> u8 {
    let (width, height) = img.dimensions();
    let at = |x: f32, y: f32| -> f32 {
        if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
            0.0
        } else {
            f32::from(img.get_pixel(x as u32, y as u32)[0])
        }
    };

    let (x0, y0) = (sx.floor(), sy.floor());
    let (fx, fy) = (sx - x0, sy - y0);

    let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1.0, y0) * fx;
    let bottom = at(x0, y0 + 1.0) * (1.0 - fx) + at(x0 + 1.0, y0 + 1.0) * fx;

    (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
}

/// Bicubic (Catmull-Rom) resize to `size × size`.
pub fn resize_square(img: &GrayImage, size: u32) -> GrayImage {
    if img.dimensions() == (size, size) {
        return img.clone();
    }
    imageops::resize(img, size, size, FilterType::CatmullRom)
}

pub fn intensity_grid(img: &GrayImage) -> Grid<u16> {
    let (width, height) = img.dimensions();
    Grid::from_fn(width as usize, height as usize, |(x, y)| {
        u16::from(img.get_pixel(x as u32, y as u32)[0])
    })
}

pub fn rgba_image(pixels: &Grid<[u8; 4]>) -> Result<RgbaImage, &'static str> {
    let raw: Vec<u8> = pixels.as_slice().iter().flatten().copied().collect();
    RgbaImage::from_vec(pixels.width() as u32, pixels.height() as u32, raw)
        .ok_or("failed to create image")
}
