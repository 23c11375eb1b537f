use moondither::{
    consts::NO_VALUE,
    dither,
    normalize::{max_sample, normalize},
    pack::{pack_rows, write_json},
    unpack, ApertureMask, DitherConfig, Grid, GridError, NormalizeError, PackLayout,
};

fn disk_photo(size: usize) -> Grid<u16> {
    Grid::from_fn(size, size, |(x, y)| ((x * 3 + y * 5) % 200 + 20) as u16)
}

#[test]
fn normalize_uses_maximum() {
    let grid = Grid::from_vec(2, 2, vec![0u16, 50, 100, 200]).unwrap();
    assert_eq!(max_sample(&grid), Some(200));

    let normalized = normalize(&grid, None).unwrap();
    assert_eq!(normalized.as_slice(), [0.0, 0.25, 0.5, 1.0]);

    let overridden = normalize(&grid, Some(100)).unwrap();
    assert_eq!(overridden.as_slice(), [0.0, 0.5, 1.0, 2.0]);
}

#[test]
fn normalize_rejects_zero_white_point() {
    let black = Grid::from_vec(2, 1, vec![0u16, 0]).unwrap();
    assert!(matches!(
        normalize(&black, None),
        Err(NormalizeError::DivisionByZero)
    ));

    let grid = Grid::from_vec(1, 1, vec![7u16]).unwrap();
    assert!(matches!(
        normalize(&grid, Some(0)),
        Err(NormalizeError::DivisionByZero)
    ));

    let empty = Grid::<u16>::from_vec(0, 0, Vec::new()).unwrap();
    assert!(normalize(&empty, None).is_err());
}

#[test]
fn grid_dimension_mismatch() {
    let err = Grid::from_vec(3, 3, vec![0u8; 8]).unwrap_err();
    assert!(matches!(
        err,
        GridError::InvalidDimensions {
            width: 3,
            height: 3,
            sample_count: 8
        }
    ));
}

#[test]
fn display_frame() {
    let size = 70;
    let normalized = normalize(&disk_photo(size), None).unwrap();
    let codes = dither(&normalized, &DitherConfig::display());
    let mask = ApertureMask::inscribed(size, size);
    let frame = mask.apply_rgba(&codes);

    for ((x, y), &[r, g, b, a]) in frame.enumerate() {
        if mask.contains(x, y) {
            assert_eq!(a, 0xFF);
            assert!(r == g && g == b);
            assert!([0x00, 0x55, 0xAA, 0xFF].contains(&r));
        } else {
            assert_eq!([r, g, b, a], [0, 0, 0, 0]);
        }
    }
}

#[test]
fn embedding_never_emits_no_value_inside() {
    let size = 128;
    let layout = PackLayout::EMBEDDING;

    // a dark corner so that some in-disk pixels quantize to the lowest bin
    let photo = Grid::from_fn(size, size, |(x, y)| if x + y < 80 { 0 } else { (x + y) as u16 });
    let normalized = normalize(&photo, None).unwrap();
    let codes = dither(
        &normalized,
        &DitherConfig::embedding(layout.bits_per_value()).unwrap(),
    );
    let mask = ApertureMask::inscribed(size, size);
    let masked = mask.apply_sentinel(&codes, NO_VALUE);

    for ((x, y), &code) in masked.enumerate() {
        if mask.contains(x, y) {
            assert_ne!(code, NO_VALUE, "({x}, {y})");
        } else {
            assert_eq!(code, NO_VALUE);
        }
    }

    let rows = pack_rows(&masked, layout).unwrap();
    assert_eq!(rows.len(), size);

    for (row, words) in masked.rows().zip(&rows) {
        assert_eq!(words.len(), 26);
        let unpacked: Vec<u8> = words
            .iter()
            .flat_map(|&word| unpack(word, layout))
            .take(size)
            .map(|v| v as u8)
            .collect();
        assert_eq!(unpacked, row);
        assert!(words.iter().all(|&w| w < 1 << 30));
    }
}

#[test]
fn packed_json_is_deterministic() {
    let size = 40;
    let layout = PackLayout::EMBEDDING;

    let render = || {
        let normalized = normalize(&disk_photo(size), None).unwrap();
        let codes = dither(&normalized, &DitherConfig::embedding(6).unwrap());
        let masked = ApertureMask::inscribed(size, size).apply_sentinel(&codes, NO_VALUE);
        let mut out = Vec::new();
        write_json(&pack_rows(&masked, layout).unwrap(), &mut out).unwrap();
        out
    };

    assert_eq!(render(), render());
}
