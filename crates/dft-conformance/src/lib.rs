//! Conformance checking for DFT outputs.
//!
//! Compares a candidate matrix (produced by the artifact under test) against
//! a trusted reference under a [`TolerancePolicy`], counting violations and
//! ranking the worst offenders for diagnostics.

pub mod compare;
pub mod report;
pub mod tolerance;

pub use compare::{compare, compare_with};
pub use report::{MismatchDetail, MismatchReport};
pub use tolerance::{
    DiagnosticPolicy, TolerancePolicy, DEFAULT_DIAGNOSTIC_FLOOR, DEFAULT_RTOL, MAX_TOP_K,
};

use dft_core::ComplexMatrix;

/// Assert two matrices are element-wise close.
///
/// Panics with the rendered [`MismatchReport`] on any mismatch.
pub fn assert_allclose(candidate: &ComplexMatrix, reference: &ComplexMatrix, atol: f64, rtol: f64) {
    let policy = TolerancePolicy::new(rtol, atol).expect("invalid tolerance");
    let report = match compare(candidate, reference, &policy) {
        Ok(report) => report,
        Err(e) => panic!("{e}"),
    };
    assert!(report.passed(), "mismatch:\n{report}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use dft_core::{Complex32, Shape};

    fn row(values: &[f32]) -> ComplexMatrix {
        let shape = Shape::new(1, values.len()).unwrap();
        ComplexMatrix::from_fn(shape, |_, c| Complex32::new(values[c], 0.0))
    }

    #[test]
    fn test_allclose_exact() {
        assert_allclose(&row(&[1.0, 2.0, 3.0]), &row(&[1.0, 2.0, 3.0]), 1e-6, 1e-6);
    }

    #[test]
    fn test_allclose_within_tolerance() {
        assert_allclose(&row(&[1.0001]), &row(&[1.0]), 1e-3, 1e-3);
    }

    #[test]
    #[should_panic(expected = "mismatch")]
    fn test_allclose_fails() {
        assert_allclose(&row(&[1.0]), &row(&[2.0]), 1e-6, 1e-6);
    }

    #[test]
    #[should_panic(expected = "Shape mismatch")]
    fn test_allclose_shape_mismatch() {
        assert_allclose(&row(&[1.0]), &row(&[1.0, 2.0]), 1e-6, 1e-6);
    }
}
