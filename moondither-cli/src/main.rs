use argh::FromArgs;
use byteorder::{BigEndian, LittleEndian};
use image::GrayImage;
use log::info;
use moondither::{
    consts::{
        BITS_PER_PIXEL, CROP_PIXELS, DEFAULT_RADIUS, DEFAULT_STEPS, ICON_RADIUS, NO_VALUE,
        PIXELS_PER_WORD,
    },
    dither::kernel::{self, Kernel},
    normalize::normalize,
    pack::{pack_rows, write_json, write_words},
    ApertureMask, DitherConfig, Ditherer, PackLayout,
};
use rayon::prelude::*;
use std::{error::Error, path::Path, process::ExitCode, str::FromStr};

mod output;
mod transform;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Greyscale disk dithering and bit packing for low bit-depth displays.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Frames(Frames),
    Pack(Pack),
}

/// Renders rotated, dithered and disk-masked PNG frames of a greyscale image.
#[derive(FromArgs)]
#[argh(subcommand, name = "frames")]
struct Frames {
    /// disk radius of every frame, in pixels (frames are 2*radius square)
    #[argh(option, default = "DEFAULT_RADIUS")]
    radius: u32,

    /// number of frames covering 90° of clockwise rotation
    #[argh(option, default = "DEFAULT_STEPS")]
    steps: u32,

    /// pixels trimmed from each edge of the source before rotating
    #[argh(option, default = "CROP_PIXELS")]
    crop: u32,

    /// disk radius of the unrotated launcher icon, 0 to skip it
    #[argh(option, default = "ICON_RADIUS")]
    icon_radius: u32,

    /// diffusion kernel (floyd-steinberg, atkinson, none)
    #[argh(option, default = "KernelArg::FloydSteinberg")]
    kernel: KernelArg,

    /// the input image (PNG, JPG, BMP or TIFF)
    #[argh(positional)]
    input: String,
    /// the directory the frames are written to
    #[argh(positional)]
    out_dir: String,
}

/// Packs the quantized pixels of a greyscale image into 32-bit words.
#[derive(FromArgs)]
#[argh(subcommand, name = "pack")]
struct Pack {
    /// resize the source to this many pixels square first
    #[argh(option)]
    size: Option<u32>,

    /// bits per packed value
    #[argh(option, default = "BITS_PER_PIXEL")]
    bits: u32,

    /// values packed into each word
    #[argh(option, default = "PIXELS_PER_WORD")]
    per_word: u32,

    /// aperture radius in pixels, defaults to half the image size
    #[argh(option)]
    radius: Option<f64>,

    /// sample value treated as white, defaults to the brightest sample
    #[argh(option)]
    white: Option<u16>,

    /// diffusion kernel (none, floyd-steinberg, atkinson)
    #[argh(option, default = "KernelArg::None")]
    kernel: KernelArg,

    /// output format (json, le, be)
    #[argh(option, default = "OutputFormat::Json")]
    format: OutputFormat,

    /// the output file, JSON is printed to stdout if omitted
    #[argh(option, short = 'o')]
    output: Option<String>,

    /// the input image (PNG, JPG, BMP or TIFF)
    #[argh(positional)]
    input: String,
}

#[derive(Debug, Clone, Copy)]
enum KernelArg {
    FloydSteinberg,
    Atkinson,
    None,
}

impl KernelArg {
    fn kernel(self) -> Kernel {
        match self {
            KernelArg::FloydSteinberg => kernel::FLOYD_STEINBERG,
            KernelArg::Atkinson => kernel::ATKINSON,
            KernelArg::None => kernel::NONE,
        }
    }
}

impl FromStr for KernelArg {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(kernel) = s.eq_ignore_ascii_case("floyd-steinberg").then_some(KernelArg::FloydSteinberg)
               .or_else(|| s.eq_ignore_ascii_case("atkinson").then_some(KernelArg::Atkinson))
               .or_else(|| s.eq_ignore_ascii_case("none").then_some(KernelArg::None))
        else { return Err("invalid kernel, expected floyd-steinberg, atkinson or none"); };

        Ok(kernel)
    }
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Json,
    Le,
    Be,
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("json").then_some(OutputFormat::Json)
               .or_else(|| s.eq_ignore_ascii_case("le").then_some(OutputFormat::Le))
               .or_else(|| s.eq_ignore_ascii_case("be").then_some(OutputFormat::Be))
        else { return Err("invalid format, expected json, le or be"); };

        Ok(format)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli { command } = argh::from_env();

    let result = match command {
        Command::Frames(options) => frames(options),
        Command::Pack(options) => pack(options),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprint!(": {cause}");
                source = cause.source();
            }
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

fn load_grey(input: &str) -> Result<GrayImage, BoxError> {
    let image = image::io::Reader::open(input)?
        .with_guessed_format()?
        .decode()?;

    info!("Loaded {}x{} image from `{input}`", image.width(), image.height());

    Ok(image.into_luma8())
}

/// Rotates, resizes, dithers and masks one frame of `2 * radius` pixels square.
fn render_frame(
    src: &GrayImage,
    degrees: f32,
    radius: u32,
    ditherer: &Ditherer,
) -> Result<image::RgbaImage, BoxError> {
    let size = 2 * radius;
    let img = transform::rotate_clockwise(src, degrees);
    let img = transform::resize_square(&img, size);

    let normalized = normalize(&transform::intensity_grid(&img), None)?;
    let codes = ditherer.dither(&normalized);
    let mask = ApertureMask::new(size as usize, size as usize, f64::from(radius));

    Ok(transform::rgba_image(&mask.apply_rgba(&codes))?)
}

fn frames(options: Frames) -> Result<(), BoxError> {
    let Frames {
        radius,
        steps,
        crop,
        icon_radius,
        kernel,
        input,
        out_dir,
    } = options;

    if radius == 0 || steps == 0 {
        return Err("radius and steps must be at least 1".into());
    }

    let src = transform::crop_edges(&load_grey(&input)?, crop)?;
    let ditherer = Ditherer::new(DitherConfig::display().with_kernel(kernel.kernel())?);
    let out_dir = Path::new(&out_dir);

    info!("Rendering {steps} frames of radius {radius} with {kernel:?} diffusion");

    // Frames are independent; each dithering pass stays sequential.
    let names = (0..steps)
        .into_par_iter()
        .map(|i| -> Result<_, BoxError> {
            let name = format!("moon{radius}-{i:02}.png");
            let degrees = 90.0 * i as f32 / steps as f32;
            let frame = render_frame(&src, degrees, radius, &ditherer)?;
            output::save_png(&out_dir.join(&name), &frame)?;
            Ok((i, name))
        })
        .collect::<Result<Vec<_>, BoxError>>()?;

    for (i, name) in names {
        println!(r#"  <bitmap id="Moon{radius}_{i:02}" filename="{name}" />"#);
    }

    if icon_radius > 0 {
        let name = format!("launcher_icon{}.png", 2 * icon_radius);
        let icon = render_frame(&src, 0.0, icon_radius, &ditherer)?;
        output::save_png(&out_dir.join(&name), &icon)?;
        info!("Written icon `{name}`");
    }

    info!("Written {steps} frames to `{}`", out_dir.display());

    Ok(())
}

fn pack(options: Pack) -> Result<(), BoxError> {
    let Pack {
        size,
        bits,
        per_word,
        radius,
        white,
        kernel,
        format,
        output: out_path,
        input,
    } = options;

    let layout = PackLayout::new(bits, per_word)?;
    let config = DitherConfig::embedding(bits)?.with_kernel(kernel.kernel())?;

    let mut img = load_grey(&input)?;
    if let Some(size) = size {
        img = transform::resize_square(&img, size);
    }
    let (width, height) = (img.width() as usize, img.height() as usize);

    let normalized = normalize(&transform::intensity_grid(&img), white)?;
    let codes = Ditherer::new(config).dither(&normalized);
    let mask = match radius {
        Some(radius) => ApertureMask::new(width, height, radius),
        None => ApertureMask::inscribed(width, height),
    };
    let masked = mask.apply_sentinel(&codes, NO_VALUE);
    let rows = pack_rows(&masked, layout)?;

    info!(
        "Packed {width}x{height} pixels into {} words per row ({bits} bits x {per_word})",
        rows.first().map_or(0, Vec::len)
    );

    match (format, out_path) {
        (OutputFormat::Json, None) => write_json(&rows, std::io::stdout().lock())?,
        (OutputFormat::Json, Some(path)) => {
            output::write_atomic(Path::new(&path), |w| Ok(write_json(&rows, w)?))?;
            info!("Written `{path}`");
        }
        (OutputFormat::Le, Some(path)) => {
            output::write_atomic(Path::new(&path), |w| {
                Ok(write_words::<LittleEndian, _>(&rows, w)?)
            })?;
            info!("Written `{path}`");
        }
        (OutputFormat::Be, Some(path)) => {
            output::write_atomic(Path::new(&path), |w| Ok(write_words::<BigEndian, _>(&rows, w)?))?;
            info!("Written `{path}`");
        }
        (_, None) => return Err("raw word output needs an output file (-o)".into()),
    }

    Ok(())
}
