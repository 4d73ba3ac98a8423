//! Reference 2D DFT computed with `rustfft`.

use dft_core::{Complex32, ComplexMatrix};
use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Unnormalised forward 2D DFT of `input`.
///
/// Every row is transformed, then every column, in double precision; the
/// result is rounded to `f32` to match the precision of the artifact.
pub fn reference_dft2(input: &ComplexMatrix) -> ComplexMatrix {
    let (rows, cols) = (input.rows(), input.cols());
    let mut buf: Vec<Complex64> = input
        .as_slice()
        .iter()
        .map(|v| Complex64::new(f64::from(v.re), f64::from(v.im)))
        .collect();

    let mut planner = FftPlanner::<f64>::new();

    let row_fft = planner.plan_fft_forward(cols);
    // Row-major storage: each chunk of `cols` is one row.
    row_fft.process(&mut buf);

    let col_fft = planner.plan_fft_forward(rows);
    let mut column = vec![Complex64::new(0.0, 0.0); rows];
    for c in 0..cols {
        for r in 0..rows {
            column[r] = buf[r * cols + c];
        }
        col_fft.process(&mut column);
        for r in 0..rows {
            buf[r * cols + c] = column[r];
        }
    }

    ComplexMatrix::from_fn(input.shape(), |r, c| {
        let v = buf[r * cols + c];
        Complex32::new(v.re as f32, v.im as f32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dft_core::Shape;

    fn c(re: f32, im: f32) -> Complex32 {
        Complex32::new(re, im)
    }

    #[test]
    fn test_2x2_real() {
        let x = ComplexMatrix::from_rows(&[
            vec![c(1.0, 0.0), c(2.0, 0.0)],
            vec![c(3.0, 0.0), c(4.0, 0.0)],
        ])
        .unwrap();
        let y = reference_dft2(&x);
        assert_eq!(
            y.as_slice(),
            &[c(10.0, 0.0), c(-2.0, 0.0), c(-4.0, 0.0), c(0.0, 0.0)]
        );
    }

    #[test]
    fn test_impulse_is_flat() {
        let shape = Shape::new(3, 5).unwrap();
        let x = ComplexMatrix::from_fn(shape, |r, col| {
            if r == 0 && col == 0 {
                c(1.0, 0.0)
            } else {
                c(0.0, 0.0)
            }
        });
        let y = reference_dft2(&x);
        for v in y.as_slice() {
            assert!((v.re - 1.0).abs() < 1e-6 && v.im.abs() < 1e-6, "{v}");
        }
    }

    #[test]
    fn test_constant_concentrates_at_dc() {
        let shape = Shape::new(4, 6).unwrap();
        let x = ComplexMatrix::from_fn(shape, |_, _| c(0.5, -0.25));
        let y = reference_dft2(&x);
        let dc = y.get(0, 0).unwrap();
        assert!((dc.re - 12.0).abs() < 1e-5 && (dc.im + 6.0).abs() < 1e-5);
        for ((r, col), v) in y.iter_indexed() {
            if (r, col) != (0, 0) {
                assert!(v.norm() < 1e-5, "[{r}, {col}] = {v}");
            }
        }
    }

    #[test]
    fn test_single_row_matches_1d() {
        let x = ComplexMatrix::from_rows(&[vec![c(1.0, 0.0), c(0.0, 1.0), c(-1.0, 0.0), c(0.0, -1.0)]])
            .unwrap();
        let y = reference_dft2(&x);
        // x[n] = i^n: all energy in bin 1.
        let expected = [c(0.0, 0.0), c(4.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)];
        for (got, want) in y.as_slice().iter().zip(expected) {
            assert!((got - want).norm() < 1e-5, "{got} vs {want}");
        }
    }
}
