pub mod config;
pub mod error;
pub mod observability;
pub mod script;

pub use error::SlothxError;
