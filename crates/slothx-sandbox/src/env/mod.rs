//! Ephemeral runtime environments: a venv per operation, removed afterwards.
//!
//! Callers get an [`builder::EphemeralEnv`] and run commands through it; the
//! temp directory never outlives the value.

pub mod builder;

pub use builder::{which_python, EphemeralEnv};
