//! Element-wise comparison engine.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use dft_core::{ComplexMatrix, DftError, Result};

use crate::report::{MismatchDetail, MismatchReport};
use crate::tolerance::{abs_error, magnitude, ranking_key, DiagnosticPolicy, TolerancePolicy};

/// Compare `candidate` against `reference` with the default diagnostic policy.
pub fn compare(
    candidate: &ComplexMatrix,
    reference: &ComplexMatrix,
    tolerance: &TolerancePolicy,
) -> Result<MismatchReport> {
    compare_with(
        candidate,
        reference,
        tolerance,
        &DiagnosticPolicy::default(),
    )
}

/// Compare `candidate` against `reference`.
///
/// Fails only when the shapes differ, before any element is examined. The
/// function is pure: the same inputs always produce the same report.
pub fn compare_with(
    candidate: &ComplexMatrix,
    reference: &ComplexMatrix,
    tolerance: &TolerancePolicy,
    diagnostics: &DiagnosticPolicy,
) -> Result<MismatchReport> {
    let shape = reference.shape();
    if candidate.shape() != shape {
        return Err(DftError::ShapeMismatch {
            expected: shape,
            got: candidate.shape(),
        });
    }

    let mut mismatches = 0usize;
    let mut top = TopK::new(diagnostics.top_k());
    let mut worst: Option<MismatchDetail> = None;

    let pairs = candidate.as_slice().iter().zip(reference.as_slice());
    for (offset, (&c, &r)) in pairs.enumerate() {
        if tolerance.is_close(c, r) {
            continue;
        }
        mismatches += 1;

        let abs_error = abs_error(c, r);
        let (row, col) = shape.index_of(offset);
        let detail = MismatchDetail {
            row,
            col,
            key: ranking_key(abs_error, magnitude(r)),
            candidate: c,
            reference: r,
            abs_error,
        };

        // Strict comparison: the earliest index wins a tie.
        if worst.as_ref().map_or(true, |w| detail.key > w.key) {
            worst = Some(detail.clone());
        }
        if !abs_error.is_finite() || abs_error > diagnostics.floor() {
            top.push(offset, detail);
        }
    }

    Ok(MismatchReport::new(
        shape,
        mismatches,
        *tolerance,
        *diagnostics,
        top.into_sorted_vec(),
        worst,
    ))
}

/// Heap entry ordered by key, then by earlier offset.
struct Ranked {
    offset: usize,
    detail: MismatchDetail,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.detail
            .key
            .total_cmp(&other.detail.key)
            .then_with(|| other.offset.cmp(&self.offset))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

/// Fixed-capacity selection of the largest entries.
///
/// A min-heap of at most `cap` entries: a new entry replaces the current
/// minimum only when it ranks strictly higher.
struct TopK {
    cap: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopK {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            heap: BinaryHeap::with_capacity(cap + 1),
        }
    }

    fn push(&mut self, offset: usize, detail: MismatchDetail) {
        if self.cap == 0 {
            return;
        }
        let entry = Ranked { offset, detail };
        if self.heap.len() < self.cap {
            self.heap.push(Reverse(entry));
            return;
        }
        let replaces_min = self.heap.peek().is_some_and(|Reverse(min)| entry > *min);
        if replaces_min {
            self.heap.pop();
            self.heap.push(Reverse(entry));
        }
    }

    /// Entries ordered largest first.
    fn into_sorted_vec(self) -> Vec<MismatchDetail> {
        // Ascending in `Reverse` is descending in `Ranked`.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(r)| r.detail)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dft_core::{Complex32, Shape};

    fn detail(key: f64) -> MismatchDetail {
        MismatchDetail {
            row: 0,
            col: 0,
            key,
            candidate: Complex32::new(0.0, 0.0),
            reference: Complex32::new(0.0, 0.0),
            abs_error: key,
        }
    }

    #[test]
    fn test_topk_keeps_largest() {
        let mut t = TopK::new(3);
        for (i, k) in [0.5, 0.1, 0.9, 0.3, 0.7, 0.2].into_iter().enumerate() {
            t.push(i, detail(k));
        }
        let keys: Vec<f64> = t.into_sorted_vec().iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_topk_ties_prefer_earlier_offset() {
        let mut t = TopK::new(2);
        for i in 0..5 {
            let mut d = detail(1.0);
            d.col = i;
            t.push(i, d);
        }
        let cols: Vec<usize> = t.into_sorted_vec().iter().map(|d| d.col).collect();
        assert_eq!(cols, vec![0, 1]);
    }

    #[test]
    fn test_topk_zero_capacity() {
        let mut t = TopK::new(0);
        t.push(0, detail(1.0));
        assert!(t.into_sorted_vec().is_empty());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let a = ComplexMatrix::zeros(Shape::new(3, 3).unwrap());
        let b = ComplexMatrix::zeros(Shape::new(4, 4).unwrap());
        let err = compare(&a, &b, &TolerancePolicy::default()).unwrap_err();
        assert!(matches!(err, DftError::ShapeMismatch { .. }));
        assert!(err.is_precondition());
    }
}
