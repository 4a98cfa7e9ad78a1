//! Install / run pipelines.
//!
//! Both start with [`resolve::resolve`] and then either hand a staged project
//! to pipx (`install`) or build a throwaway venv and run the script in it
//! (`run`). Every subprocess goes through the [`Toolchain`]'s runner.

pub mod install;
pub mod resolve;
pub mod run;

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use anyhow::Result;
use slothx_core::config::RuntimeConfig;
use slothx_sandbox::env::which_python;
use slothx_sandbox::{CommandRunner, Invocation};

/// Runner plus the interpreter and tool choices for one invocation.
pub struct Toolchain<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: RuntimeConfig,
    python: OnceCell<PathBuf>,
}

impl<'a> Toolchain<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: RuntimeConfig) -> Self {
        Self {
            runner,
            config,
            python: OnceCell::new(),
        }
    }

    /// Use `python` as the base interpreter without looking it up on PATH.
    pub fn with_python(runner: &'a dyn CommandRunner, config: RuntimeConfig, python: PathBuf) -> Self {
        Self {
            runner,
            config,
            python: OnceCell::from(python),
        }
    }

    /// Base interpreter, discovered on first use so that paths which never
    /// spawn anything (missing script, no `main`) do not require Python.
    pub fn base_python(&self) -> Result<&Path> {
        if let Some(p) = self.python.get() {
            return Ok(p.as_path());
        }
        let found = which_python(self.config.python.as_deref())?;
        Ok(self.python.get_or_init(|| found).as_path())
    }

    /// Persistent installer: `SLOTHX_INSTALLER` if set, else `<python> -m pipx`.
    pub fn installer(&self) -> Result<Invocation> {
        match self.config.installer.as_deref() {
            Some([program, rest @ ..]) => Ok(Invocation::new(program).args(rest)),
            _ => Ok(Invocation::new(self.base_python()?).args(["-m", "pipx"])),
        }
    }
}
