use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// slothx - install or run a standalone Python script without writing a pyproject.toml
#[derive(Parser, Debug)]
#[command(name = "slothx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a pyproject.toml for the script and install it with pipx
    Install {
        /// Python script to analyze and install (must define `main`)
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Pass --force to pipx to reinstall over an existing installation
        #[arg(long, default_value = "false")]
        force: bool,

        /// Do not pin the installed package after installation
        #[arg(long, default_value = "false")]
        no_pin: bool,

        /// Print the generated pyproject.toml to stdout instead of installing
        #[arg(long, default_value = "false")]
        pyproject_toml: bool,

        /// Base Python interpreter (default: SLOTHX_PYTHON, then python3/python on PATH)
        #[arg(long, value_name = "PATH")]
        python: Option<String>,
    },

    /// Run the script once inside a throwaway virtual environment
    ///
    /// Dependencies are installed into a fresh venv which is removed after the
    /// script exits. slothx exits with the script's exit code.
    Run {
        /// Python script to run (must define `main`)
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Base Python interpreter (default: SLOTHX_PYTHON, then python3/python on PATH)
        #[arg(long, value_name = "PATH")]
        python: Option<String>,

        /// Arguments forwarded verbatim to the script (put them after `--`)
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
}
