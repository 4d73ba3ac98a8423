//! Core type definitions: Shape, ComplexMatrix.

use num_complex::Complex32;
use serde::Serialize;

use crate::{DftError, Result};

/// Matrix shape (rows x cols). Both dimensions are positive and the element
/// count fits in `usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a shape, rejecting zero dimensions and element-count overflow.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(DftError::InvalidShape { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major flat offset of `(row, col)`.
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Inverse of [`Shape::offset`].
    pub fn index_of(&self, offset: usize) -> (usize, usize) {
        (offset / self.cols, offset % self.cols)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Immutable row-major matrix of single-precision complex values.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexMatrix {
    shape: Shape,
    data: Vec<Complex32>,
}

impl ComplexMatrix {
    /// Wrap row-major data, checking it fills `shape` exactly.
    pub fn from_vec(shape: Shape, data: Vec<Complex32>) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(DftError::DataLength {
                shape,
                expected: shape.numel(),
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a matrix by evaluating `f(row, col)` in row-major order.
    pub fn from_fn<F>(shape: Shape, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Complex32,
    {
        let mut data = Vec::with_capacity(shape.numel());
        for row in 0..shape.rows() {
            for col in 0..shape.cols() {
                data.push(f(row, col));
            }
        }
        Self { shape, data }
    }

    /// Build from nested rows. Every row must have the same length.
    pub fn from_rows(rows: &[Vec<Complex32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let shape = Shape::new(rows.len(), cols)?;
        let mut data = Vec::with_capacity(shape.numel());
        for row in rows {
            if row.len() != cols {
                return Err(DftError::ShapeMismatch {
                    expected: shape,
                    got: Shape::new(rows.len(), row.len())?,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { shape, data })
    }

    pub fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![Complex32::new(0.0, 0.0); shape.numel()],
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex32> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        Some(self.data[self.shape.offset(row, col)])
    }

    /// One row as a slice. Panics when `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[Complex32] {
        let start = self.shape.offset(row, 0);
        &self.data[start..start + self.cols()]
    }

    pub fn as_slice(&self) -> &[Complex32] {
        &self.data
    }

    /// Iterate `((row, col), value)` in row-major order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = ((usize, usize), Complex32)> + '_ {
        let shape = self.shape;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (shape.index_of(i), v))
    }
}
