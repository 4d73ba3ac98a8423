//! Random input matrices.

use std::path::Path;

use dft_core::{Complex32, ComplexMatrix, Result, Shape};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Matrix whose real and imaginary parts are independent uniform draws in `[0, 1)`.
pub fn generate_input<R: Rng + ?Sized>(shape: Shape, rng: &mut R) -> ComplexMatrix {
    ComplexMatrix::from_fn(shape, |_, _| {
        let re: f32 = rng.random();
        let im: f32 = rng.random();
        Complex32::new(re, im)
    })
}

/// Reproducible [`generate_input`] from a seed.
pub fn generate_seeded(shape: Shape, seed: u64) -> ComplexMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_input(shape, &mut rng)
}

/// Generate an input, write it to `path` in exchange format, and return it.
pub fn write_input_file(path: &Path, shape: Shape, seed: u64) -> Result<ComplexMatrix> {
    let input = generate_seeded(shape, seed);
    dft_io::write_matrix_file(path, &input)?;
    info!(path = %path.display(), %shape, seed, "generated input matrix");
    Ok(input)
}
