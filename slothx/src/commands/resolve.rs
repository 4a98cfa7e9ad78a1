//! Shared first stage of `install` and `run`.

use std::path::Path;

use anyhow::Result;
use slothx_core::script::{DependencySource, ScriptAnalysis, ScriptSource};
use slothx_core::SlothxError;
use slothx_sandbox::{analyze_with_interpreter, classify};

use super::Toolchain;

/// Read `script`, require a `main` entry point and pick its dependencies:
/// the inline block if present, else the imports that fail in a clean venv.
pub fn resolve(tc: &Toolchain<'_>, script: &Path) -> Result<(ScriptSource, DependencySource)> {
    let source = ScriptSource::read(script)?;
    let analysis = source.analyze_or_else(|source, rejected| recheck(tc, source, rejected))?;
    let deps = source.resolve_dependencies(&analysis, |imports| {
        classify(tc.runner, tc.base_python()?, imports)
    })?;
    tracing::info!("{}: {}", source.path.display(), deps);
    Ok((source, deps))
}

/// Let the base interpreter parse a script the built-in parser rejected.
/// Its verdict wins; if it cannot be asked, the original rejection stands.
fn recheck(tc: &Toolchain<'_>, source: &ScriptSource, rejected: SlothxError) -> Result<ScriptAnalysis> {
    let python = match tc.base_python() {
        Ok(python) => python,
        Err(e) => {
            tracing::debug!("No interpreter to recheck {}: {:#}", source.path.display(), e);
            return Err(rejected.into());
        }
    };
    match analyze_with_interpreter(tc.runner, python, &source.path) {
        Ok(analysis) => {
            tracing::info!("{} parsed by {}", source.path.display(), python.display());
            Ok(analysis)
        }
        Err(e) if matches!(e.downcast_ref::<SlothxError>(), Some(SlothxError::Syntax { .. })) => Err(e),
        Err(e) => {
            tracing::debug!("Recheck of {} failed: {:#}", source.path.display(), e);
            Err(rejected.into())
        }
    }
}
