//! Observability: tracing init.
//!
//! Uses `config::ObservabilityConfig` for SLOTHX_QUIET, SLOTHX_LOG_LEVEL and
//! SLOTHX_LOG_JSON. Logs always go to stderr; stdout belongs to the generated
//! pyproject output and to the script being run.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize tracing. Call once at process startup.
/// `RUST_LOG` wins; SLOTHX_QUIET=1 limits output to WARN and above.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(cfg)));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn default_directive(cfg: &ObservabilityConfig) -> String {
    if cfg.quiet {
        "slothx=warn".to_string()
    } else {
        cfg.log_level.clone()
    }
}
