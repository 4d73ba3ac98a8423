use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dft_conformance::{
    compare_with, DiagnosticPolicy, MismatchReport, TolerancePolicy, DEFAULT_DIAGNOSTIC_FLOOR,
    DEFAULT_RTOL, MAX_TOP_K,
};
use dft_core::{DftError, Shape};
use dft_parity::{
    reference_dft2, run_harness, write_input_file, CommandSpec, ExternalArtifact, HarnessConfig,
    PipelineError, DEFAULT_COLS, DEFAULT_ROWS,
};
use thiserror::Error;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "dft-harness")]
#[command(about = "Validate a GPU 2D DFT artifact against a reference FFT", long_about = None)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate input, build and run the artifact, and compare against the reference.
    Run(RunArgs),
    /// Write a random input matrix in exchange format.
    Generate(GenerateArgs),
    /// Print the reference transform of an exchange-format file.
    Reference {
        /// Exchange-format input file.
        input: PathBuf,
    },
    /// Compare two exchange-format files.
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct ShapeArgs {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// RNG seed. A random seed is chosen and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ToleranceArgs {
    /// Relative tolerance, measured against the reference value.
    #[arg(long, default_value_t = DEFAULT_RTOL)]
    rtol: f64,

    /// Absolute tolerance.
    #[arg(long, default_value_t = 0.0)]
    atol: f64,

    /// Mismatches with absolute error at or below this are left out of the top list.
    #[arg(long, default_value_t = DEFAULT_DIAGNOSTIC_FLOOR)]
    floor: f64,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when any element mismatches.
    #[arg(long)]
    fail_on_mismatch: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    shape: ShapeArgs,

    #[command(flatten)]
    tolerance: ToleranceArgs,

    #[command(flatten)]
    report: ReportArgs,

    /// Where the input matrix is written for the artifact. Relative to `--workdir`.
    #[arg(long, default_value = "input.txt")]
    input: PathBuf,

    /// Working directory for build and run commands.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Command printing the transform on stdout; `{input}` is replaced by the input path.
    #[arg(long, default_value = "./build/wgpu_dft")]
    artifact: String,

    /// Build command, repeatable. Replaces the default CMake configure and build steps.
    #[arg(long = "build-cmd")]
    build_cmd: Vec<String>,

    /// Run the artifact without building it first.
    #[arg(long)]
    skip_build: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    shape: ShapeArgs,

    #[arg(short, long, default_value = "input.txt")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Output of the artifact under test.
    candidate: PathBuf,

    /// Trusted reference output.
    reference: PathBuf,

    #[command(flatten)]
    tolerance: ToleranceArgs,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Error, Debug)]
enum Error {
    #[error(transparent)]
    Harness(#[from] DftError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("invalid command line {0:?}")]
    Command(String),
    #[error("json encode error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.cmd {
        Cmd::Run(args) => run(args),
        Cmd::Generate(args) => generate(args),
        Cmd::Reference { input } => reference(input),
        Cmd::Compare(args) => compare(args),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: RunArgs) -> Result<ExitCode, Error> {
    let shape = Shape::new(args.shape.rows, args.shape.cols)?;
    let seed = resolve_seed(args.shape.seed);

    let run_cmd = CommandSpec::parse(&args.artifact).ok_or(Error::Command(args.artifact))?;
    let workdir = std::fs::canonicalize(&args.workdir).map_err(DftError::from)?;
    let input_path = workdir.join(&args.input);
    let mut artifact = ExternalArtifact::cmake(workdir).with_run(run_cmd);
    if args.skip_build || !args.build_cmd.is_empty() {
        artifact = artifact.without_build();
    }
    if !args.skip_build {
        for line in &args.build_cmd {
            let step = CommandSpec::parse(line).ok_or_else(|| Error::Command(line.clone()))?;
            artifact = artifact.with_build_step(step);
        }
    }

    let config = HarnessConfig {
        input_path,
        tolerance: TolerancePolicy::new(args.tolerance.rtol, args.tolerance.atol)?,
        diagnostics: DiagnosticPolicy::new(args.tolerance.floor, MAX_TOP_K)?,
        ..HarnessConfig::new(shape, seed)
    };

    let outcome = run_harness(&config, &artifact)?;
    emit(&outcome.report, &args.report)
}

fn generate(args: GenerateArgs) -> Result<ExitCode, Error> {
    let shape = Shape::new(args.shape.rows, args.shape.cols)?;
    let seed = resolve_seed(args.shape.seed);
    write_input_file(&args.output, shape, seed)?;
    Ok(ExitCode::SUCCESS)
}

fn reference(input: PathBuf) -> Result<ExitCode, Error> {
    let m = dft_io::read_matrix_file(&input)?;
    let out = reference_dft2(&m);
    print!("{}", dft_io::Exchange(&out));
    Ok(ExitCode::SUCCESS)
}

fn compare(args: CompareArgs) -> Result<ExitCode, Error> {
    let tolerance = TolerancePolicy::new(args.tolerance.rtol, args.tolerance.atol)?;
    let diagnostics = DiagnosticPolicy::new(args.tolerance.floor, MAX_TOP_K)?;
    let candidate = dft_io::read_matrix_file(&args.candidate)?;
    let reference = dft_io::read_matrix_file(&args.reference)?;
    let report = compare_with(&candidate, &reference, &tolerance, &diagnostics)?;
    emit(&report, &args.report)
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "input seed (pass --seed to reproduce)");
    seed
}

fn emit(report: &MismatchReport, args: &ReportArgs) -> Result<ExitCode, Error> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    if args.fail_on_mismatch && !report.passed() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
