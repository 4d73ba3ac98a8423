//! Tolerance and diagnostic policies.

use dft_core::{Complex32, DftError, Result};
use serde::Serialize;

/// Relative tolerance used when none is given.
pub const DEFAULT_RTOL: f64 = 1e-4;

/// Absolute-error floor below which mismatches are left out of the ranked list.
pub const DEFAULT_DIAGNOSTIC_FLOOR: f64 = 1e-4;

/// Upper bound on the ranked mismatch list.
pub const MAX_TOP_K: usize = 5;

/// Element-wise acceptance rule `|a - b| <= atol + rtol * |b|`.
///
/// `b` is always the reference value: relative error is measured against the
/// trusted side only, so the predicate is not symmetric in its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TolerancePolicy {
    rtol: f64,
    atol: f64,
}

impl TolerancePolicy {
    /// Both components must be finite and non-negative.
    pub fn new(rtol: f64, atol: f64) -> Result<Self> {
        for (name, v) in [("rtol", rtol), ("atol", atol)] {
            if !v.is_finite() || v < 0.0 {
                return Err(DftError::InvalidTolerance(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(Self { rtol, atol })
    }

    /// Purely relative policy (`atol = 0`).
    pub fn relative(rtol: f64) -> Result<Self> {
        Self::new(rtol, 0.0)
    }

    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    pub fn atol(&self) -> f64 {
        self.atol
    }

    /// Largest accepted absolute error for a reference of magnitude `reference_abs`.
    pub fn allowance(&self, reference_abs: f64) -> f64 {
        self.atol + self.rtol * reference_abs
    }

    /// Equal values are always close; a non-finite error never is.
    pub fn is_close(&self, candidate: Complex32, reference: Complex32) -> bool {
        if candidate == reference {
            return true;
        }
        let err = abs_error(candidate, reference);
        err.is_finite() && err <= self.allowance(magnitude(reference))
    }
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_RTOL,
            atol: 0.0,
        }
    }
}

/// Controls which mismatches are ranked for the diagnostic list.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiagnosticPolicy {
    floor: f64,
    top_k: usize,
}

impl DiagnosticPolicy {
    /// `top_k` is clamped to [`MAX_TOP_K`].
    pub fn new(floor: f64, top_k: usize) -> Result<Self> {
        if !floor.is_finite() || floor < 0.0 {
            return Err(DftError::InvalidTolerance(format!(
                "diagnostic floor must be finite and non-negative, got {floor}"
            )));
        }
        Ok(Self {
            floor,
            top_k: top_k.min(MAX_TOP_K),
        })
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

impl Default for DiagnosticPolicy {
    fn default() -> Self {
        Self {
            floor: DEFAULT_DIAGNOSTIC_FLOOR,
            top_k: MAX_TOP_K,
        }
    }
}

/// `|a - b|` evaluated in double precision.
pub fn abs_error(candidate: Complex32, reference: Complex32) -> f64 {
    let dre = f64::from(candidate.re) - f64::from(reference.re);
    let dim = f64::from(candidate.im) - f64::from(reference.im);
    dre.hypot(dim)
}

/// `|z|` evaluated in double precision.
pub fn magnitude(z: Complex32) -> f64 {
    f64::from(z.re).hypot(f64::from(z.im))
}

/// Severity used to order mismatches.
///
/// Relative error when the reference is non-zero. A zero reference has no
/// meaningful relative error, so it is ranked by absolute error instead.
/// Non-finite errors rank as `+inf`.
pub fn ranking_key(abs_error: f64, reference_abs: f64) -> f64 {
    if !abs_error.is_finite() {
        return f64::INFINITY;
    }
    if reference_abs > 0.0 {
        abs_error / reference_abs
    } else {
        abs_error
    }
}
