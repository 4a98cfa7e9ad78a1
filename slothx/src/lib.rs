//! slothx CLI library: argument parsing and dispatch to the install / run pipelines.

mod cli;
pub mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use slothx_core::config::RuntimeConfig;
use slothx_sandbox::ProcessRunner;

use commands::install::InstallOptions;
use commands::Toolchain;

/// Parse args, run the command and return the exit code to terminate with.
pub fn run_cli() -> Result<i32> {
    let cli = Cli::parse();
    slothx_core::observability::init_tracing();

    let runner = ProcessRunner;
    match cli.command {
        Commands::Install {
            script,
            force,
            no_pin,
            pyproject_toml,
            python,
        } => {
            let config = RuntimeConfig::from_env().with_cli_overrides(python);
            let tc = Toolchain::new(&runner, config);
            commands::install::install(
                &tc,
                &script,
                InstallOptions {
                    force,
                    pin: !no_pin,
                    manifest_only: pyproject_toml,
                },
            )
        }
        Commands::Run {
            script,
            python,
            args,
        } => {
            let config = RuntimeConfig::from_env().with_cli_overrides(python);
            let tc = Toolchain::new(&runner, config);
            commands::run::run(&tc, &script, &args)
        }
    }
}
