//! The sequential harness run: generate, reference, invoke, parse, compare.

use std::fmt;
use std::path::PathBuf;

use dft_conformance::{compare_with, DiagnosticPolicy, MismatchReport, TolerancePolicy};
use dft_core::{ComplexMatrix, DftError, Shape};
use tracing::info;

use crate::generator::write_input_file;
use crate::oracle::TransformOracle;
use crate::reference::reference_dft2;

/// Pipeline stage, used to say where a run aborted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Reference,
    Invoke,
    Parse,
    Compare,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generate => write!(f, "generate"),
            Stage::Reference => write!(f, "reference"),
            Stage::Invoke => write!(f, "invoke"),
            Stage::Parse => write!(f, "parse"),
            Stage::Compare => write!(f, "compare"),
        }
    }
}

/// A fatal error tagged with the stage that raised it.
#[derive(thiserror::Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: DftError,
}

trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> StageContext<T> for dft_core::Result<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError { stage, source })
    }
}

/// Run-scoped configuration.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub shape: Shape,
    pub seed: u64,
    pub input_path: PathBuf,
    pub tolerance: TolerancePolicy,
    pub diagnostics: DiagnosticPolicy,
}

/// Default run dimensions.
pub const DEFAULT_ROWS: usize = 512;
pub const DEFAULT_COLS: usize = 512;

impl HarnessConfig {
    pub fn new(shape: Shape, seed: u64) -> Self {
        Self {
            shape,
            seed,
            input_path: PathBuf::from("input.txt"),
            tolerance: TolerancePolicy::default(),
            diagnostics: DiagnosticPolicy::default(),
        }
    }
}

/// Everything produced by one run. Mismatches live in `report`.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub input: ComplexMatrix,
    pub reference: ComplexMatrix,
    pub candidate: ComplexMatrix,
    pub report: MismatchReport,
}

/// Run the harness once against `oracle`.
///
/// Stages run strictly in order and the first failure aborts the run.
pub fn run_harness<O>(config: &HarnessConfig, oracle: &O) -> Result<RunOutcome, PipelineError>
where
    O: TransformOracle + ?Sized,
{
    info!(shape = %config.shape, seed = config.seed, "starting harness run");

    let input =
        write_input_file(&config.input_path, config.shape, config.seed).stage(Stage::Generate)?;

    let reference = reference_dft2(&input);
    info!(stage = %Stage::Reference, "reference transform computed");

    let stdout = oracle.transform(&config.input_path).stage(Stage::Invoke)?;
    info!(stage = %Stage::Invoke, bytes = stdout.len(), "artifact finished");

    let candidate = dft_io::parse_matrix(&stdout).stage(Stage::Parse)?;

    let report = compare_with(
        &candidate,
        &reference,
        &config.tolerance,
        &config.diagnostics,
    )
    .stage(Stage::Compare)?;
    info!(
        mismatches = report.mismatches(),
        total = report.total(),
        "comparison complete"
    );

    Ok(RunOutcome {
        input,
        reference,
        candidate,
        report,
    })
}
