//! Typed configuration structs, grouped by concern and loaded from the environment.

use super::env_keys::{observability as obv_keys, runtime as rt_keys};
use super::loader::{env_bool, env_optional, env_or};

/// Default package installed before any script dependency in run mode.
pub const DEFAULT_BUILD_HELPER: &str = "setuptools";

/// Interpreter and external tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Explicit base interpreter; `None` means discover `python3`/`python` on PATH.
    pub python: Option<String>,
    /// Explicit installer command line split on whitespace; `None` means `<python> -m pipx`.
    pub installer: Option<Vec<String>>,
    pub build_helper: String,
}

impl RuntimeConfig {
    /// Load from the environment (reads `.env` once).
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let python = env_optional(rt_keys::SLOTHX_PYTHON);
        let installer = env_optional(rt_keys::SLOTHX_INSTALLER)
            .map(|s| s.split_whitespace().map(String::from).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        let build_helper = env_or(rt_keys::SLOTHX_BUILD_HELPER, || {
            DEFAULT_BUILD_HELPER.to_string()
        });
        Self {
            python,
            installer,
            build_helper,
        }
    }

    /// CLI flags win over the environment.
    pub fn with_cli_overrides(mut self, python: Option<String>) -> Self {
        if let Some(p) = python {
            self.python = Some(p);
        }
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            python: None,
            installer: None,
            build_helper: DEFAULT_BUILD_HELPER.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::SLOTHX_QUIET, false),
                log_level: env_or(obv_keys::SLOTHX_LOG_LEVEL, || "warn".to_string()),
                log_json: env_bool(obv_keys::SLOTHX_LOG_JSON, false),
            }
        })
    }
}
