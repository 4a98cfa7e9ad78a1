//! Subprocess execution seam.
//!
//! Every external action slothx takes (venv creation, import probes, pip,
//! pipx, the target script) is a blocking child process started through a
//! [`CommandRunner`]. The production implementation is [`ProcessRunner`];
//! tests substitute a recording fake.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// Exit code reported when a child has no code (terminated by a signal).
pub const SIGNALED_EXIT_CODE: i32 = 1;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Arguments as lossy UTF-8, for logging and assertions.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for a in &self.args {
            write!(f, " {}", a.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Execution result with captured output
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Blocking command execution.
///
/// `Err` means the process could not be started at all; a started process
/// always yields its exit code, uninterpreted.
pub trait CommandRunner {
    /// Run with stdout/stderr inherited so progress is visible live.
    fn stream(&self, inv: &Invocation) -> Result<i32>;

    /// Run with all output discarded; true on a zero exit.
    fn probe(&self, inv: &Invocation) -> Result<bool>;

    /// Run capturing stdout and stderr.
    fn capture(&self, inv: &Invocation) -> Result<ExecutionResult>;
}

/// `std::process` implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn stream(&self, inv: &Invocation) -> Result<i32> {
        tracing::debug!("exec: {}", inv);
        let status = inv
            .command()
            .status()
            .with_context(|| format!("Failed to start {}", inv.program.display()))?;
        Ok(exit_code(status))
    }

    fn probe(&self, inv: &Invocation) -> Result<bool> {
        tracing::debug!("probe: {}", inv);
        let status = inv
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("Failed to start {}", inv.program.display()))?;
        Ok(status.success())
    }

    fn capture(&self, inv: &Invocation) -> Result<ExecutionResult> {
        tracing::debug!("capture: {}", inv);
        let out = inv
            .command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to start {}", inv.program.display()))?;
        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            exit_code: exit_code(out.status),
        })
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(SIGNALED_EXIT_CODE)
}
