//! Build and run the external compute artifact as a child process.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use dft_core::{DftError, Result};
use tracing::{debug, info};

use crate::oracle::TransformOracle;

/// Argument replaced by the input file path when a command is spawned.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Lines of stderr kept in an invocation error.
const STDERR_TAIL_LINES: usize = 20;

/// A program and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace. No shell quoting is supported.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self, workdir: &Path, input: &Path) -> Command {
        // Relative paths like `./build/wgpu_dft` are relative to the workdir.
        let p = Path::new(&self.program);
        let program = if p.is_relative() && p.components().count() > 1 {
            workdir.join(p)
        } else {
            p.to_path_buf()
        };

        let mut cmd = Command::new(program);
        cmd.current_dir(workdir);
        for arg in &self.args {
            if arg == INPUT_PLACEHOLDER {
                cmd.arg(input);
            } else {
                cmd.arg(arg);
            }
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The artifact under test: optional build steps plus the command that
/// prints the transform on stdout.
#[derive(Clone, Debug)]
pub struct ExternalArtifact {
    workdir: PathBuf,
    build: Vec<CommandSpec>,
    run: CommandSpec,
}

impl ExternalArtifact {
    /// Artifact with no build steps.
    pub fn new(workdir: impl Into<PathBuf>, run: CommandSpec) -> Self {
        Self {
            workdir: workdir.into(),
            build: Vec::new(),
            run,
        }
    }

    /// CMake project producing `build/wgpu_dft`, which reads `input.txt`
    /// from its working directory.
    pub fn cmake(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            build: vec![
                CommandSpec::new("cmake", ["-B", "build", "-S", "."]),
                CommandSpec::new("cmake", ["--build", "build"]),
            ],
            run: CommandSpec::new("./build/wgpu_dft", Vec::<String>::new()),
        }
    }

    pub fn with_build_step(mut self, step: CommandSpec) -> Self {
        self.build.push(step);
        self
    }

    pub fn with_run(mut self, run: CommandSpec) -> Self {
        self.run = run;
        self
    }

    /// Drop all build steps, running a prebuilt artifact as-is.
    pub fn without_build(mut self) -> Self {
        self.build.clear();
        self
    }

    pub fn build_steps(&self) -> &[CommandSpec] {
        &self.build
    }

    pub fn run_command(&self) -> &CommandSpec {
        &self.run
    }

    /// Run every build step in order, stopping at the first failure.
    pub fn build(&self, input: &Path) -> Result<()> {
        for step in &self.build {
            info!(command = %step, workdir = %self.workdir.display(), "building artifact");
            let stdout = run_capture(step, &self.workdir, input)?;
            for line in String::from_utf8_lossy(&stdout).lines() {
                debug!(target: "dft_parity::build", "{line}");
            }
        }
        Ok(())
    }

    /// Run the artifact and return its stdout.
    pub fn run(&self, input: &Path) -> Result<String> {
        info!(command = %self.run, input = %input.display(), "running artifact");
        let stdout = run_capture(&self.run, &self.workdir, input)?;
        String::from_utf8(stdout).map_err(|e| DftError::ExternalInvocation {
            command: self.run.to_string(),
            reason: format!("stdout is not valid UTF-8: {e}"),
        })
    }
}

impl TransformOracle for ExternalArtifact {
    fn transform(&self, input_path: &Path) -> Result<String> {
        let input = std::fs::canonicalize(input_path)?;
        self.build(&input)?;
        self.run(&input)
    }
}

fn run_capture(cmd: &CommandSpec, workdir: &Path, input: &Path) -> Result<Vec<u8>> {
    let out = cmd
        .command(workdir, input)
        .output()
        .map_err(|e| DftError::ExternalInvocation {
            command: cmd.to_string(),
            reason: e.to_string(),
        })?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    if out.status.success() {
        for line in stderr.lines() {
            debug!(command = %cmd, "stderr: {line}");
        }
        return Ok(out.stdout);
    }

    let lines: Vec<&str> = stderr.lines().collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
    let reason = if tail.is_empty() {
        out.status.to_string()
    } else {
        format!("{}\n{tail}", out.status)
    };
    Err(DftError::ExternalInvocation {
        command: cmd.to_string(),
        reason,
    })
}
