//! Mismatch report: the read-only result of one comparison.

use std::fmt;

use dft_core::{Complex32, Shape};
use serde::Serialize;

use crate::tolerance::{DiagnosticPolicy, TolerancePolicy};

/// One mismatching element with its severity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MismatchDetail {
    pub row: usize,
    pub col: usize,
    /// Ranking key: relative error, or absolute error for a zero reference.
    pub key: f64,
    pub candidate: Complex32,
    pub reference: Complex32,
    pub abs_error: f64,
}

/// Outcome of comparing a candidate matrix against the reference.
///
/// A non-zero `mismatches` count is the signal the harness exists to detect;
/// it is not an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MismatchReport {
    shape: Shape,
    total: usize,
    mismatches: usize,
    tolerance: TolerancePolicy,
    diagnostics: DiagnosticPolicy,
    top: Vec<MismatchDetail>,
    worst: Option<MismatchDetail>,
}

impl MismatchReport {
    pub(crate) fn new(
        shape: Shape,
        mismatches: usize,
        tolerance: TolerancePolicy,
        diagnostics: DiagnosticPolicy,
        top: Vec<MismatchDetail>,
        worst: Option<MismatchDetail>,
    ) -> Self {
        Self {
            shape,
            total: shape.numel(),
            mismatches,
            tolerance,
            diagnostics,
            top,
            worst,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of compared elements.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn mismatches(&self) -> usize {
        self.mismatches
    }

    /// True when every element is within tolerance.
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }

    pub fn tolerance(&self) -> &TolerancePolicy {
        &self.tolerance
    }

    pub fn diagnostics(&self) -> &DiagnosticPolicy {
        &self.diagnostics
    }

    /// Worst mismatches above the diagnostic floor, largest key first.
    pub fn top(&self) -> &[MismatchDetail] {
        &self.top
    }

    /// Ranking keys of [`MismatchReport::top`], descending.
    pub fn top_keys(&self) -> Vec<f64> {
        self.top.iter().map(|d| d.key).collect()
    }

    /// Largest-key mismatch over all mismatching elements, floor ignored.
    pub fn worst(&self) -> Option<&MismatchDetail> {
        self.worst.as_ref()
    }
}

struct Cx(Complex32);

impl fmt::Display for Cx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:e}{:+e}i)", self.0.re, self.0.im)
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mismatched elements: {} / {} ({}; rtol={:e}, atol={:e})",
            self.mismatches,
            self.total,
            self.shape,
            self.tolerance.rtol(),
            self.tolerance.atol()
        )?;
        if self.passed() {
            return Ok(());
        }

        if self.top.is_empty() {
            writeln!(
                f,
                "No mismatch has absolute error above the diagnostic floor {:e}",
                self.diagnostics.floor()
            )?;
        } else {
            writeln!(
                f,
                "Top {} relative errors (absolute error > {:e}):",
                self.top.len(),
                self.diagnostics.floor()
            )?;
            for (rank, d) in self.top.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. [{}, {}] rel={:e} candidate={} reference={} abs={:e}",
                    rank + 1,
                    d.row,
                    d.col,
                    d.key,
                    Cx(d.candidate),
                    Cx(d.reference),
                    d.abs_error
                )?;
            }
        }

        if let Some(w) = &self.worst {
            writeln!(
                f,
                "Worst difference at [{}, {}]: candidate={} reference={} abs error={:e}",
                w.row,
                w.col,
                Cx(w.candidate),
                Cx(w.reference),
                w.abs_error
            )?;
        }
        Ok(())
    }
}
