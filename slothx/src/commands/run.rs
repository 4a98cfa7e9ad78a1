//! `slothx run`: install dependencies into a throwaway venv, run the script
//! there once, then remove the venv.

use std::ffi::OsString;
use std::iter;
use std::path::Path;

use anyhow::Result;
use slothx_core::SlothxError;
use slothx_sandbox::EphemeralEnv;

use super::resolve::resolve;
use super::Toolchain;

/// Returns the script's own exit code. Dependency install failures come back
/// as [`SlothxError::ToolFailed`] with pip's exit code.
pub fn run(tc: &Toolchain<'_>, script: &Path, args: &[OsString]) -> Result<i32> {
    let (source, deps) = resolve(tc, script)?;

    let mut env = EphemeralEnv::create(tc.runner, tc.base_python()?, true)?;

    let helper = tc.config.build_helper.as_str();
    for spec in iter::once(helper).chain(deps.packages().iter().map(String::as_str)) {
        let code = env.pip_install(tc.runner, spec)?;
        if code != 0 {
            return Err(SlothxError::ToolFailed {
                tool: format!("pip install {}", spec),
                code,
            }
            .into());
        }
    }

    eprintln!(
        "----- dependencies installed, running {} -----",
        source.path.display()
    );
    let script_args = iter::once(source.path.as_os_str()).chain(args.iter().map(OsString::as_os_str));
    let code = env.run(tc.runner, script_args)?;
    tracing::info!("{} exited with {}", source.path.display(), code);

    env.destroy()?;
    Ok(code)
}
