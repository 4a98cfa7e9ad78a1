//! Script analysis through the base interpreter's own `ast` module.
//!
//! The built-in parser trails the newest Python grammar; the interpreter that
//! will actually run the script is the final judge of what parses.

use std::path::Path;

use anyhow::Result;
use slothx_core::script::imports::{from_listing, LISTING_PROGRAM, LISTING_SYNTAX_EXIT};
use slothx_core::script::ScriptAnalysis;
use slothx_core::SlothxError;

use crate::runner::{CommandRunner, Invocation};

/// Parse `script` with `python` and collect its imports and entry-point flag.
///
/// Returns [`SlothxError::Syntax`] when the interpreter rejects the file. Any
/// other failure (spawn error, crash) is a plain error.
pub fn analyze_with_interpreter(
    runner: &dyn CommandRunner,
    python: &Path,
    script: &Path,
) -> Result<ScriptAnalysis> {
    let inv = Invocation::new(python)
        .args(["-I", "-c", LISTING_PROGRAM])
        .arg(script);
    let out = runner.capture(&inv)?;
    match out.exit_code {
        0 => Ok(from_listing(&out.stdout)),
        LISTING_SYNTAX_EXIT => Err(SlothxError::Syntax {
            path: script.to_path_buf(),
            message: out.stderr.trim().to_string(),
        }
        .into()),
        code => anyhow::bail!(
            "{} could not analyze {} (exit {}): {}",
            python.display(),
            script.display(),
            code,
            out.stderr.trim()
        ),
    }
}
