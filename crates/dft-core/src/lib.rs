//! Core types for the 2D DFT validation harness.
//!
//! `dft-core` provides the foundational types (`ComplexMatrix`, `Shape`) and
//! the error taxonomy shared by every stage of the harness.
//!
//! # Error classes
//!
//! - precondition errors: invalid shapes, shape mismatches, bad tolerances
//! - format errors: malformed exchange-format text
//! - external invocation errors: the artifact under test failed to build or run
//!
//! A tolerance mismatch is never an error; it is the outcome the harness reports.

pub mod types;

pub use num_complex::Complex32;
pub use types::{ComplexMatrix, Shape};

pub type Result<T> = std::result::Result<T, DftError>;

#[derive(thiserror::Error, Debug)]
pub enum DftError {
    #[error("Invalid shape: {rows}x{cols} (dimensions must be positive and the element count must fit in usize)")]
    InvalidShape { rows: usize, cols: usize },

    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    #[error("Data length mismatch: shape {shape} needs {expected} elements, got {got}")]
    DataLength {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),

    #[error("Format error on line {line}: {kind}")]
    Format { line: usize, kind: FormatError },

    #[error("External invocation of `{command}` failed: {reason}")]
    ExternalInvocation { command: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DftError {
    /// Whether this error is a violated precondition (bad shape or policy).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DftError::InvalidShape { .. }
                | DftError::ShapeMismatch { .. }
                | DftError::DataLength { .. }
                | DftError::InvalidTolerance(_)
        )
    }

    pub(crate) fn format(line: usize, kind: FormatError) -> Self {
        DftError::Format { line, kind }
    }
}

/// What went wrong while reading exchange-format text.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("missing header line `<rows> <cols>`")]
    MissingHeader,

    #[error("malformed header {found:?}, expected `<rows> <cols>`")]
    BadHeader { found: String },

    #[error("header declares a zero dimension ({rows}x{cols})")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("missing data row: expected {expected} rows, found {found}")]
    MissingRow { expected: usize, found: usize },

    #[error("expected {expected} tokens, found {found}")]
    TokenCount { expected: usize, found: usize },

    #[error("non-numeric token {token:?}")]
    BadNumber { token: String },
}

impl FormatError {
    /// Attach a 1-based line number.
    pub fn at_line(self, line: usize) -> DftError {
        DftError::format(line, self)
    }
}
