//! Runtime configuration.
//!
//! Every field has a default, so an empty document (or no file at all) gives
//! a working runtime:
//!
//! ```toml
//! render_debounce_ms = 16
//! default_width = 80
//! default_height = 24
//! escape_closes_portal = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Quiet period before a burst of state changes turns into one render.
    pub render_debounce_ms: u64,
    /// Width used when a resize reports a non-positive width.
    pub default_width: u16,
    /// Height used when a resize reports a negative height.
    pub default_height: u16,
    /// An Escape no portal item handles closes the topmost portal.
    pub escape_closes_portal: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            render_debounce_ms: 16,
            default_width: 80,
            default_height: 24,
            escape_closes_portal: true,
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_width == 0 {
            return Err(ConfigError::Invalid {
                field: "default_width",
                reason: "must be at least 1".into(),
            });
        }
        if self.render_debounce_ms > 10_000 {
            return Err(ConfigError::Invalid {
                field: "render_debounce_ms",
                reason: format!("{} ms is longer than 10 s", self.render_debounce_ms),
            });
        }
        Ok(())
    }

    pub fn render_debounce(&self) -> Duration {
        Duration::from_millis(self.render_debounce_ms)
    }
}
