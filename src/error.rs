//! Error types for the fallible edges of the runtime.
//!
//! Hooks, focus and portal operations never fail; they fall back to zero
//! values, `false` or no-ops. Only loading configuration and starting the
//! runtime can go wrong.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start render scheduler: {0}")]
    Scheduler(#[from] io::Error),
}
