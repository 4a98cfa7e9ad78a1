//! Environment variable keys.

/// Interpreter and external tools
pub mod runtime {
    /// Base interpreter used to create environments and to invoke the installer.
    pub const SLOTHX_PYTHON: &str = "SLOTHX_PYTHON";

    /// Persistent installer command line, e.g. `pipx` or `python3 -m pipx`.
    pub const SLOTHX_INSTALLER: &str = "SLOTHX_INSTALLER";

    /// Package installed first in every run-mode environment.
    pub const SLOTHX_BUILD_HELPER: &str = "SLOTHX_BUILD_HELPER";
}

/// Logging
pub mod observability {
    pub const SLOTHX_QUIET: &str = "SLOTHX_QUIET";
    pub const SLOTHX_LOG_LEVEL: &str = "SLOTHX_LOG_LEVEL";
    pub const SLOTHX_LOG_JSON: &str = "SLOTHX_LOG_JSON";
}
