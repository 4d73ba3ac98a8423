//! The seam between the harness and the transform under test.

use std::path::Path;

use dft_core::Result;

use crate::reference::reference_dft2;

/// Something that computes a 2D DFT from an exchange-format input file.
///
/// Given the path of the input file on disk, returns exchange-format text
/// holding the transform of that input. Must be synchronous and
/// deterministic for a fixed input.
pub trait TransformOracle {
    fn transform(&self, input_path: &Path) -> Result<String>;
}

impl<F> TransformOracle for F
where
    F: Fn(&Path) -> Result<String>,
{
    fn transform(&self, input_path: &Path) -> Result<String> {
        self(input_path)
    }
}

/// In-process oracle backed by [`reference_dft2`].
///
/// Useful to self-check the harness plumbing: comparing it against the
/// reference must always yield zero mismatches.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceOracle;

impl TransformOracle for ReferenceOracle {
    fn transform(&self, input_path: &Path) -> Result<String> {
        let input = dft_io::read_matrix_file(input_path)?;
        Ok(dft_io::to_exchange_string(&reference_dft2(&input)))
    }
}
