//! Run configuration.
//!
//! Settings come from an optional TOML file; the CLI layers flags and
//! environment variables on top.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{load_settings, QueueSettings};
