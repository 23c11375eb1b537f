use moondither::{
    dither::{
        kernel::{Kernel, ATKINSON, FLOYD_STEINBERG, NONE},
        ErrorAccumulator,
    },
    dither, DitherConfig, DitherError, Ditherer, Grid, QuantizationLevels, ZeroPolicy,
};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

/// A deterministic, busy test pattern in `0.0..=1.0`.
fn pattern(width: usize, height: usize) -> Grid<f32> {
    Grid::from_fn(width, height, |(x, y)| {
        let v = (x * 37 + y * 91 + x * y * 13) % 101;
        v as f32 / 100.0
    })
}

#[test]
fn two_by_two_floyd_steinberg() {
    let values = Grid::from_vec(2, 2, vec![0.9, 0.1, 0.1, 0.1]).unwrap();
    let ditherer = Ditherer::new(DitherConfig::display());
    let mut acc = ErrorAccumulator::new(&values, FLOYD_STEINBERG);

    assert_eq!(ditherer.quantize_pixel(&mut acc, 0, 0), 0xFF);

    // -0.1 spread as 7/16 right, 5/16 below, 1/16 below right; 3/16 below left is lost
    assert!(approx_eq(acc.row(0)[1], 0.05625));
    assert!(approx_eq(acc.row(1)[0], 0.1 - 0.1 * 5.0 / 16.0));
    assert!(approx_eq(acc.row(1)[1], 0.1 - 0.1 * 1.0 / 16.0));

    assert_eq!(ditherer.quantize_pixel(&mut acc, 1, 0), 0x00);
    assert_eq!(ditherer.quantize_pixel(&mut acc, 0, 1), 0x00);
    assert_eq!(ditherer.quantize_pixel(&mut acc, 1, 1), 0x00);

    let codes = ditherer.dither(&values);
    assert_eq!(codes.as_slice(), [0xFF, 0x00, 0x00, 0x00]);
}

#[test]
fn only_configured_codes() {
    let configs = [
        DitherConfig::display(),
        DitherConfig::display().with_kernel(ATKINSON).unwrap(),
        DitherConfig::embedding(6).unwrap(),
        DitherConfig::embedding(2).unwrap(),
    ];

    for config in configs {
        let allowed = config.output_codes();
        let codes = dither(&pattern(47, 31), &config);
        assert!(
            codes.as_slice().iter().all(|code| allowed.contains(code)),
            "unexpected code for {config:?}"
        );
    }

    assert_eq!(
        DitherConfig::display().output_codes(),
        [0x00, 0x55, 0xAA, 0xFF]
    );
}

#[test]
fn deterministic() {
    let values = pattern(64, 64);
    for config in [
        DitherConfig::display(),
        DitherConfig::display().with_kernel(ATKINSON).unwrap(),
    ] {
        assert_eq!(dither(&values, &config), dither(&values, &config));
    }
}

#[test]
fn row_error_reaches_next_row() {
    let (width, height) = (23, 9);
    let values = pattern(width, height);
    let ditherer = Ditherer::new(DitherConfig::display());
    let mut acc = ErrorAccumulator::new(&values, FLOYD_STEINBERG);

    for y in 0..height {
        let next_before: f32 = acc.row(y + 1).iter().sum();

        let mut errors = Vec::with_capacity(width);
        for x in 0..width {
            let pending = acc.row(y)[x];
            let level = ditherer.config().levels().select(pending).value;
            ditherer.quantize_pixel(&mut acc, x, y);
            errors.push(pending - level);
        }

        let next_after: f32 = acc.row(y + 1).iter().sum();
        let total: f32 = errors.iter().sum();
        let expected =
            total * 9.0 / 16.0 - errors[0] * 3.0 / 16.0 - errors[width - 1] * 1.0 / 16.0;

        assert!(
            (next_after - next_before - expected).abs() < 1e-4,
            "row {y}: diffused {}, expected {expected}",
            next_after - next_before
        );
    }
}

#[test]
fn preserves_mean_tone() {
    for tone in [0.1f32, 0.3, 0.5, 0.62, 0.9] {
        let values = Grid::from_vec(64, 64, vec![tone; 64 * 64]).unwrap();
        let codes = dither(&values, &DitherConfig::display());
        let mean = codes
            .as_slice()
            .iter()
            .map(|&c| f32::from(c) / 255.0)
            .sum::<f32>()
            / codes.as_slice().len() as f32;

        assert!((mean - tone).abs() < 0.02, "tone {tone} dithered to {mean}");
    }
}

#[test]
fn clamps_out_of_range_values() {
    let values = Grid::from_vec(3, 1, vec![-2.0, 5.0, 1.0]).unwrap();
    let codes = dither(&values, &DitherConfig::display().with_kernel(NONE).unwrap());
    assert_eq!(codes.as_slice(), [0x00, 0xFF, 0xFF]);
}

#[test]
fn embedding_reserves_zero() {
    let values = Grid::from_vec(4, 1, vec![0.0, 0.001, 0.5, 1.0]).unwrap();
    let codes = dither(&values, &DitherConfig::embedding(6).unwrap());
    assert_eq!(codes.as_slice(), [1, 1, 31, 63]);

    let plain = DitherConfig::new(
        QuantizationLevels::indexed(6).unwrap(),
        NONE,
        ZeroPolicy::Allow,
    )
    .unwrap();
    assert_eq!(dither(&values, &plain).as_slice(), [0, 0, 31, 63]);
}

#[test]
fn rejects_non_causal_kernels() {
    let backwards = Kernel {
        entries: &[(1, 0, 1), (-1, 0, 1)],
        divisor: 2,
    };
    assert!(matches!(
        DitherConfig::display().with_kernel(backwards),
        Err(DitherError::NonCausalKernel { .. })
    ));

    let zero = Kernel {
        entries: &[(1, 0, 1)],
        divisor: 0,
    };
    assert!(matches!(
        DitherConfig::display().with_kernel(zero),
        Err(DitherError::ZeroDivisor)
    ));
}

#[test]
fn empty_grid() {
    let values = Grid::from_vec(0, 0, Vec::new()).unwrap();
    assert!(dither(&values, &DitherConfig::display()).is_empty());
}

#[test]
fn quantize_row_matches_full_pass() {
    let values = pattern(17, 5);
    let ditherer = Ditherer::new(DitherConfig::display());
    let mut acc = ditherer.accumulator(&values);
    assert_eq!(acc.kernel(), FLOYD_STEINBERG);

    let rows: Vec<u8> = (0..5)
        .flat_map(|y| ditherer.quantize_row(&mut acc, y))
        .collect();
    assert_eq!(rows, ditherer.dither(&values).into_vec());
}

#[test]
fn accumulator_follows_configured_kernel() {
    let values = pattern(9, 4);
    let ditherer = Ditherer::new(DitherConfig::display().with_kernel(ATKINSON).unwrap());
    let mut acc = ditherer.accumulator(&values);
    assert_eq!(acc.kernel(), ATKINSON);

    let rows: Vec<u8> = (0..4)
        .flat_map(|y| ditherer.quantize_row(&mut acc, y))
        .collect();
    assert_eq!(rows, ditherer.dither(&values).into_vec());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "accumulator kernel differs")]
fn foreign_accumulator_kernel_panics() {
    let values = pattern(4, 2);
    let ditherer = Ditherer::new(DitherConfig::display());
    let mut acc = ErrorAccumulator::new(&values, ATKINSON);
    ditherer.quantize_pixel(&mut acc, 0, 0);
}
