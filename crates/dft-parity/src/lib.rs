//! DFT Parity Harness.
//!
//! Drives one validation run of an external 2D DFT artifact: generate a
//! random input matrix, compute the reference transform with `rustfft`, hand
//! the input to the artifact, parse what it prints, and compare the two
//! under a tolerance policy.
//!
//! The artifact sits behind [`TransformOracle`], so the pipeline can be
//! exercised with an in-process oracle instead of a real build.

pub mod external;
pub mod generator;
pub mod oracle;
pub mod pipeline;
pub mod reference;

pub use dft_conformance::assert_allclose;
pub use external::{CommandSpec, ExternalArtifact, INPUT_PLACEHOLDER};
pub use generator::{generate_input, generate_seeded, write_input_file};
pub use oracle::{ReferenceOracle, TransformOracle};
pub use pipeline::{
    run_harness, HarnessConfig, PipelineError, RunOutcome, Stage, DEFAULT_COLS, DEFAULT_ROWS,
};
pub use reference::reference_dft2;
