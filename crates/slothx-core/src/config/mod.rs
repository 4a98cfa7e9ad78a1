//! slothx configuration layer
//!
//! All environment-variable reads live here; callers go through the typed
//! structs instead of calling `std::env::var` directly.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool`, `.env` loading
//! - `schema`: `RuntimeConfig`, `ObservabilityConfig`
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use schema::{ObservabilityConfig, RuntimeConfig};
