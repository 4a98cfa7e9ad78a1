//! Build throwaway Python virtual environments rooted in a temp directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use slothx_core::SlothxError;
use tempfile::TempDir;

use crate::runner::{CommandRunner, Invocation};

/// Temp directory prefix for every environment slothx creates.
pub const TEMP_PREFIX: &str = "slothx-";

const VENV_DIR: &str = "venv";

/// Find the base interpreter: an explicit choice, else `python3`, else `python`.
pub fn which_python(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return which::which(p)
            .with_context(|| format!("Configured Python interpreter '{}' not found", p));
    }
    for name in ["python3", "python"] {
        if let Ok(path) = which::which(name) {
            tracing::debug!("Using base interpreter {}", path.display());
            return Ok(path);
        }
    }
    anyhow::bail!("python3 or python not found in PATH")
}

/// Interpreter path inside a venv rooted at `venv_dir`.
pub fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

/// An isolated interpreter living in its own temp directory.
///
/// Owns the directory: [`EphemeralEnv::destroy`] or drop removes it, on every
/// exit path. `destroy` is idempotent.
#[derive(Debug)]
pub struct EphemeralEnv {
    root: Option<TempDir>,
    root_path: PathBuf,
    python: PathBuf,
    with_installer: bool,
}

impl EphemeralEnv {
    /// Create a fresh venv from `base_python`.
    ///
    /// `with_installer = false` passes `--without-pip`, which is enough for
    /// import probes. If venv creation fails the temp directory is removed
    /// before the error is returned.
    pub fn create(
        runner: &dyn CommandRunner,
        base_python: &Path,
        with_installer: bool,
    ) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(|e| SlothxError::Environment(format!("Create temp dir: {}", e)))?;
        let root_path = root.path().to_path_buf();
        let venv_dir = root_path.join(VENV_DIR);

        let mut inv = Invocation::new(base_python).args(["-m", "venv"]);
        if !with_installer {
            inv = inv.arg("--without-pip");
        }
        inv = inv.arg(&venv_dir);

        let out = runner.capture(&inv).map_err(|e| {
            SlothxError::Environment(format!("Create venv: {:#}", e))
        })?;
        if !out.success() {
            return Err(SlothxError::Environment(format!(
                "venv failed (exit {}): {}",
                out.exit_code,
                out.stderr.trim()
            ))
            .into());
        }

        tracing::debug!(
            "Created environment at {} (installer: {})",
            venv_dir.display(),
            with_installer
        );
        Ok(Self {
            root: Some(root),
            root_path,
            python: venv_python(&venv_dir),
            with_installer,
        })
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Invocation of the environment's interpreter with `args`.
    pub fn command<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Invocation::new(&self.python).args(args)
    }

    /// Run the interpreter with `args`, output streamed to our own stdio.
    pub fn run<I, S>(&self, runner: &dyn CommandRunner, args: I) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        runner.stream(&self.command(args))
    }

    /// `python -m pip install <spec>` inside the environment.
    pub fn pip_install(&self, runner: &dyn CommandRunner, spec: &str) -> Result<i32> {
        if !self.with_installer {
            return Err(SlothxError::Environment(
                "environment was created without pip".to_string(),
            )
            .into());
        }
        self.run(
            runner,
            ["-m", "pip", "install", "--disable-pip-version-check", spec],
        )
    }

    /// Remove the environment. Safe to call more than once.
    pub fn destroy(&mut self) -> Result<()> {
        if let Some(root) = self.root.take() {
            root.close().map_err(|e| {
                SlothxError::Environment(format!(
                    "Remove {}: {}",
                    self.root_path.display(),
                    e
                ))
            })?;
            tracing::debug!("Removed environment {}", self.root_path.display());
        }
        Ok(())
    }
}

impl Drop for EphemeralEnv {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            tracing::warn!("{:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ExecutionResult;
    use std::cell::RefCell;

    #[derive(Default)]
    struct VenvRunner {
        venv_exit: i32,
        calls: RefCell<Vec<Invocation>>,
    }

    impl CommandRunner for VenvRunner {
        fn stream(&self, inv: &Invocation) -> Result<i32> {
            self.calls.borrow_mut().push(inv.clone());
            Ok(0)
        }
        fn probe(&self, inv: &Invocation) -> Result<bool> {
            self.calls.borrow_mut().push(inv.clone());
            Ok(true)
        }
        fn capture(&self, inv: &Invocation) -> Result<ExecutionResult> {
            self.calls.borrow_mut().push(inv.clone());
            Ok(ExecutionResult {
                stderr: "Error: no ensurepip".to_string(),
                exit_code: self.venv_exit,
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_create_without_installer_and_destroy_twice() {
        let runner = VenvRunner::default();
        let mut env = EphemeralEnv::create(&runner, Path::new("python3"), false).unwrap();
        let root = env.root_path.clone();
        assert!(root.exists());
        assert!(root
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(TEMP_PREFIX));

        let calls = runner.calls.borrow();
        let args = calls[0].arg_strings();
        assert_eq!(&args[..3], ["-m", "venv", "--without-pip"]);
        assert_eq!(args[3], root.join(VENV_DIR).to_string_lossy());
        drop(calls);

        assert!(env.python().starts_with(&root));
        env.destroy().unwrap();
        assert!(!root.exists());
        env.destroy().unwrap();
    }

    #[test]
    fn test_failed_venv_leaves_nothing_behind() {
        let runner = VenvRunner {
            venv_exit: 1,
            ..Default::default()
        };
        let err = EphemeralEnv::create(&runner, Path::new("python3"), true).unwrap_err();
        assert!(format!("{:#}", err).contains("no ensurepip"));

        let calls = runner.calls.borrow();
        let venv_arg = calls[0].args.last().unwrap();
        let root = Path::new(venv_arg).parent().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_drop_removes_root() {
        let runner = VenvRunner::default();
        let env = EphemeralEnv::create(&runner, Path::new("python3"), true).unwrap();
        let root = env.root_path.clone();
        drop(env);
        assert!(!root.exists());
    }

    #[test]
    fn test_pip_requires_installer() {
        let runner = VenvRunner::default();
        let env = EphemeralEnv::create(&runner, Path::new("python3"), false).unwrap();
        assert!(env.pip_install(&runner, "rich").is_err());

        let with_pip = EphemeralEnv::create(&runner, Path::new("python3"), true).unwrap();
        assert_eq!(with_pip.pip_install(&runner, "rich").unwrap(), 0);
        let calls = runner.calls.borrow();
        let last = calls.last().unwrap();
        assert_eq!(last.program, with_pip.python());
        assert_eq!(
            last.arg_strings(),
            vec!["-m", "pip", "install", "--disable-pip-version-check", "rich"]
        );
    }
}
