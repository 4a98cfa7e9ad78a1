//! Script analysis: read a standalone script, find its imports and entry
//! point, and decide where its dependency list comes from.

pub mod imports;
pub mod inline;
pub mod pyproject;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::SlothxError;
pub use imports::{ImportSet, ScriptAnalysis};

/// Script text plus the path it was read from. Read once per invocation.
#[derive(Debug, Clone)]
pub struct ScriptSource {
    pub path: PathBuf,
    pub text: String,
}

impl ScriptSource {
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SlothxError::ScriptNotFound(path.to_path_buf()).into());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Read {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    pub fn analyze(&self) -> Result<ScriptAnalysis, SlothxError> {
        imports::extract(&self.text, &self.path)
    }

    /// Like [`ScriptSource::analyze`], but a syntax rejection is handed to
    /// `recheck`, which may still produce an analysis (for example from the
    /// interpreter's own parser) or return the final error.
    pub fn analyze_or_else<R>(&self, recheck: R) -> Result<ScriptAnalysis>
    where
        R: FnOnce(&Self, SlothxError) -> Result<ScriptAnalysis>,
    {
        match self.analyze() {
            Ok(analysis) => Ok(analysis),
            Err(rejected @ SlothxError::Syntax { .. }) => recheck(self, rejected),
            Err(e) => Err(e.into()),
        }
    }

    pub fn inline_dependencies(&self) -> Result<Option<Vec<String>>, SlothxError> {
        inline::parse(&self.text)
    }

    /// Resolve the dependency list from this script's `analysis`.
    ///
    /// Fails with [`SlothxError::NoEntryPoint`] before `classify` is ever
    /// called. A declared inline block wins outright, even when empty;
    /// otherwise `classify` turns the import set into third-party names.
    pub fn resolve_dependencies<F>(
        &self,
        analysis: &ScriptAnalysis,
        classify: F,
    ) -> Result<DependencySource>
    where
        F: FnOnce(&ImportSet) -> Result<Vec<String>>,
    {
        if !analysis.has_entry_point {
            return Err(SlothxError::NoEntryPoint(self.path.clone()).into());
        }
        match self.inline_dependencies()? {
            Some(declared) => Ok(DependencySource::Declared(declared)),
            None => Ok(DependencySource::Inferred(classify(&analysis.imports)?)),
        }
    }
}

/// Where a script's dependency list came from. The two are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Listed in the inline `# /// script` block.
    Declared(Vec<String>),
    /// Imports that failed to resolve in a pristine environment.
    Inferred(Vec<String>),
}

impl DependencySource {
    pub fn packages(&self) -> &[String] {
        match self {
            Self::Declared(p) | Self::Inferred(p) => p,
        }
    }
}

impl fmt::Display for DependencySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared(p) => write!(f, "declared: [{}]", p.join(", ")),
            Self::Inferred(p) => write!(f, "inferred: [{}]", p.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &str) -> ScriptSource {
        ScriptSource {
            path: PathBuf::from("tool.py"),
            text: text.to_string(),
        }
    }

    fn resolve<F>(s: &ScriptSource, classify: F) -> Result<DependencySource>
    where
        F: FnOnce(&ImportSet) -> Result<Vec<String>>,
    {
        let analysis = s.analyze()?;
        s.resolve_dependencies(&analysis, classify)
    }

    #[test]
    fn test_declared_block_wins_over_imports() {
        let s = source(
            "# /// script\n# dependencies = [\"httpx\"]\n# ///\nimport requests\n\ndef main():\n    pass\n",
        );
        let resolved =
            resolve(&s, |_| panic!("classifier must not run when a block is declared")).unwrap();
        assert_eq!(resolved, DependencySource::Declared(vec!["httpx".to_string()]));
    }

    #[test]
    fn test_empty_declared_block_is_still_declared() {
        let s = source("# /// script\n# dependencies = []\n# ///\nimport requests\ndef main(): pass\n");
        let resolved = resolve(&s, |_| Ok(vec!["requests".to_string()])).unwrap();
        assert_eq!(resolved, DependencySource::Declared(vec![]));
    }

    #[test]
    fn test_falls_back_to_classifier() {
        let s = source("import os\nimport requests.adapters\n\ndef main():\n    pass\n");
        let resolved = resolve(&s, |imports| {
            assert!(imports.contains("os"));
            assert!(imports.contains("requests.adapters"));
            Ok(vec!["requests".to_string()])
        })
        .unwrap();
        assert_eq!(resolved, DependencySource::Inferred(vec!["requests".to_string()]));
        assert_eq!(resolved.packages(), ["requests".to_string()]);
    }

    #[test]
    fn test_missing_main_fails_before_classification() {
        let s = source("import requests\n");
        let err = resolve(&s, |_| panic!("no classification without an entry point")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlothxError>(),
            Some(SlothxError::NoEntryPoint(_))
        ));
    }

    #[test]
    fn test_recheck_only_sees_syntax_rejections() {
        let broken = source("def main(:\n    pass\n");
        let analysis = broken
            .analyze_or_else(|s, rejected| {
                assert_eq!(s.path, Path::new("tool.py"));
                assert!(matches!(rejected, SlothxError::Syntax { .. }));
                Ok(imports::from_listing("import rich\nmain\n"))
            })
            .unwrap();
        assert!(analysis.imports.contains("rich"));
        assert!(analysis.has_entry_point);

        let fine = source("import os\ndef main(): pass\n");
        let analysis = fine
            .analyze_or_else(|_, _| panic!("valid source is never rechecked"))
            .unwrap();
        assert!(analysis.imports.contains("os"));

        let err = broken
            .analyze_or_else(|_, rejected| Err(rejected.into()))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlothxError>(),
            Some(SlothxError::Syntax { .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScriptSource::read(&dir.path().join("nope.py")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlothxError>(),
            Some(SlothxError::ScriptNotFound(_))
        ));
    }
}
