//! Configuration schema definitions

use crate::validation::{ValidationResult, Validator};
use serde::{Deserialize, Serialize};

/// Accepted values for `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Report rendering
    #[serde(default)]
    pub output: OutputConfig,

    /// Upload acceptance limits
    #[serde(default)]
    pub input: InputConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> ValidationResult {
        Validator::new()
            .one_of("logging.level", &self.logging.level, LOG_LEVELS)
            .custom("logging.directory", || match &self.logging.directory {
                Some(dir) if dir.trim().is_empty() => Some("Must not be blank".to_string()),
                _ => None,
            })
            .warn_if(
                "input.max_bytes",
                self.input.max_bytes == 0,
                "Upload size limit disabled",
            )
            .validate()
    }
}

/// How reports are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// The report's JSON wire shape
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Colorize text output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

/// Input acceptance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Largest accepted upload in bytes; 0 disables the limit
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

impl InputConfig {
    /// Whether `len` bytes exceed the limit
    pub fn exceeds_limit(&self, len: u64) -> bool {
        self.max_bytes != 0 && len > self.max_bytes
    }

    /// Most bytes worth reading from a stream before it is known to be over
    /// the limit; `None` when unlimited
    pub fn read_cap(&self) -> Option<u64> {
        (self.max_bytes != 0).then(|| self.max_bytes.saturating_add(1))
    }
}

fn default_max_bytes() -> u64 {
    20 * 1024 * 1024
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,

    /// Also write daily log files here (`~` is expanded)
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}
