//! Error taxonomy shared by every slothx crate.
//!
//! Orchestration code works with `anyhow::Result`; the binary downcasts to
//! [`SlothxError`] to pick the process exit code.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlothxError {
    #[error("{} not found.", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("'main' function not found in {}.", .0.display())]
    NoEntryPoint(PathBuf),

    #[error("failed to parse {}: {message}", .path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("invalid dependencies section: `dependencies = [` is never closed (line {line})")]
    InvalidDependenciesSection { line: usize },

    #[error("{tool} exited with code {code}")]
    ToolFailed { tool: String, code: i32 },

    #[error("environment error: {0}")]
    Environment(String),
}

impl SlothxError {
    /// Process exit code for this error: external tool codes pass through
    /// unchanged, everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Exit code for an arbitrary error chain.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<SlothxError>())
        .map_or(1, SlothxError::exit_code)
}
