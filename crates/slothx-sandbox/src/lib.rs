pub mod analyzer;
pub mod classifier;
pub mod env;
pub mod runner;

pub use analyzer::analyze_with_interpreter;
pub use classifier::classify;
pub use env::EphemeralEnv;
pub use runner::{CommandRunner, ExecutionResult, Invocation, ProcessRunner};
