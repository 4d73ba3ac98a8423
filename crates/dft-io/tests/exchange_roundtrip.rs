use dft_core::{Complex32, ComplexMatrix, Shape};
use dft_io::{parse_matrix, read_matrix_file, to_exchange_string, write_matrix_file};
use proptest::prelude::*;

fn matrix(rows: usize, cols: usize, data: &[f32]) -> ComplexMatrix {
    let shape = Shape::new(rows, cols).unwrap();
    let values = data
        .chunks_exact(2)
        .map(|p| Complex32::new(p[0], p[1]))
        .collect();
    ComplexMatrix::from_vec(shape, values).unwrap()
}

fn arb_matrix() -> impl Strategy<Value = ComplexMatrix> {
    (1usize..=9, 1usize..=9).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(
            prop::num::f32::NORMAL | prop::num::f32::ZERO | prop::num::f32::SUBNORMAL,
            2 * rows * cols,
        )
        .prop_map(move |data| matrix(rows, cols, &data))
    })
}

proptest! {
    /// serialize-then-parse reproduces every value bit for bit.
    #[test]
    fn roundtrip_exact(m in arb_matrix()) {
        let parsed = parse_matrix(&to_exchange_string(&m)).unwrap();
        prop_assert_eq!(parsed.shape(), m.shape());
        for (a, b) in parsed.as_slice().iter().zip(m.as_slice()) {
            prop_assert_eq!(a.re.to_bits(), b.re.to_bits());
            prop_assert_eq!(a.im.to_bits(), b.im.to_bits());
        }
    }
}

#[test]
fn roundtrip_1x1() {
    let m = matrix(1, 1, &[0.123_456_79, -9.875]);
    assert_eq!(parse_matrix(&to_exchange_string(&m)).unwrap(), m);
}

#[test]
fn roundtrip_non_square() {
    let data: Vec<f32> = (0..2 * 3 * 7).map(|i| i as f32 * 0.37 - 5.0).collect();
    let m = matrix(3, 7, &data);
    let text = to_exchange_string(&m);
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().next(), Some("3 7"));
    assert_eq!(parse_matrix(&text).unwrap(), m);
}

#[test]
fn roundtrip_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");

    let data: Vec<f32> = (0..2 * 4 * 5).map(|i| (i as f32).sin()).collect();
    let m = matrix(4, 5, &data);
    write_matrix_file(&path, &m).unwrap();
    let loaded = read_matrix_file(&path).unwrap();
    assert_eq!(loaded, m);
}

#[test]
fn read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_matrix_file(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, dft_core::DftError::Io(_)));
}

#[test]
fn parses_numpy_style_tokens() {
    // Python str(float) formatting, as emitted by numpy-based generators.
    let text = "1 2\n0.5488135039273248 0.7151893663724195 1e-05 -3.0\n";
    let m = parse_matrix(text).unwrap();
    assert!((m.get(0, 0).unwrap().re - 0.548_813_5).abs() < 1e-7);
    assert_eq!(m.get(0, 1).unwrap(), Complex32::new(1e-5, -3.0));
}
