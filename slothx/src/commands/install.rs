//! `slothx install`: stage a generated project and hand it to pipx.

use std::path::Path;

use anyhow::{Context, Result};
use slothx_core::script::pyproject;
use slothx_core::SlothxError;
use slothx_sandbox::env::builder::TEMP_PREFIX;

use super::resolve::resolve;
use super::Toolchain;

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Reinstall over an existing installation (`pipx install --force`).
    pub force: bool,
    /// Pin the package after a successful install.
    pub pin: bool,
    /// Print the generated pyproject.toml and stop.
    pub manifest_only: bool,
}

/// Returns the process exit code (0 on success). Installer failures come back
/// as [`SlothxError::ToolFailed`] carrying the installer's exit code.
pub fn install(tc: &Toolchain<'_>, script: &Path, opts: InstallOptions) -> Result<i32> {
    let (source, deps) = resolve(tc, script)?;

    if opts.manifest_only {
        let (text, _) = pyproject::generate(&source.path, deps.packages())?;
        println!("{}", text);
        return Ok(0);
    }

    let staging = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .context("Create staging directory")?;
    let descriptor = pyproject::write_project(&source.path, deps.packages(), staging.path())?;

    let mut cmd = tc.installer()?.arg("install");
    if opts.force {
        cmd = cmd.arg("--force");
    }
    cmd = cmd.arg(staging.path());

    eprintln!("Installing with pipx...");
    let code = tc.runner.stream(&cmd)?;
    if code != 0 {
        return Err(SlothxError::ToolFailed {
            tool: "pipx install".to_string(),
            code,
        }
        .into());
    }
    eprintln!("Installation complete!");

    if opts.pin {
        pin(tc, &descriptor.importable_name)?;
    }

    staging.close().context("Remove staging directory")?;
    Ok(0)
}

/// Pin `package` if the installer knows how; a missing `pin` sub-command only warns.
fn pin(tc: &Toolchain<'_>, package: &str) -> Result<()> {
    let installer = tc.installer()?;
    let probe = installer.clone().args(["pin", "--help"]);
    let supported = match tc.runner.probe(&probe) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::debug!("pin probe failed to start: {:#}", e);
            false
        }
    };
    if !supported {
        tracing::warn!("pinning not supported by installer; skipping");
        return Ok(());
    }

    let code = tc.runner.stream(&installer.args(["pin", package]))?;
    if code != 0 {
        return Err(SlothxError::ToolFailed {
            tool: "pipx pin".to_string(),
            code,
        }
        .into());
    }
    tracing::info!("Pinned {}", package);
    Ok(())
}
