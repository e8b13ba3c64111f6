//! Error handling with context and recovery suggestions
//!
//! Host-side failures (reading input, loading configuration, rejecting an
//! upload before it reaches the validator) are reported through [`Error`],
//! which carries:
//! - an [`ErrorCode`] for programmatic handling and exit status
//! - optional context and a recovery suggestion
//!
//! Image validation outcomes are not errors; they are reports produced by
//! `photogate-image`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ErrorCode {
    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Input rejection (4xxx), raised before validation runs
    EmptyInput = 4001,
    MissingImageType = 4002,
    InputTooLarge = 4003,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            _ => "Input",
        }
    }

    /// Process exit code a host should use for this error
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            4 => exit_codes::INPUT_REJECTED,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Message with its context prefixed, on one line
    pub fn detail(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{ctx}: {}", self.message),
            None => self.message.clone(),
        }
    }

    // Convenience constructors

    #[allow(missing_docs)]
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .photogate.toml file or drop --config to use defaults")
    }

    /// Upload contained no bytes
    pub fn empty_input() -> Self {
        Self::new(ErrorCode::EmptyInput, "uploaded file is empty")
            .with_suggestion("file content is empty")
    }

    /// Image type (profile name) was blank
    pub fn missing_image_type(known: &[&str]) -> Self {
        Self::new(ErrorCode::MissingImageType, "missing image type").with_suggestion(format!(
            "provide an image type, one of: {}",
            known.join(", ")
        ))
    }

    /// Upload exceeded the configured size limit.
    ///
    /// `actual` is `None` when the input is a stream that was cut off at the
    /// limit rather than measured.
    pub fn input_too_large(actual: Option<u64>, limit: u64) -> Self {
        let detail = match actual {
            Some(actual) => format!("file is {actual} bytes, limit is {limit} bytes"),
            None => format!("file exceeds the limit of {limit} bytes"),
        };
        Self::new(ErrorCode::InputTooLarge, "uploaded file too large").with_suggestion(detail)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_FAILED: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const INPUT_REJECTED: i32 = 4;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}")).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::EmptyInput.to_string(), "E4001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::InputTooLarge.category(), "Input");
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(ErrorCode::EmptyInput.exit_code(), exit_codes::INPUT_REJECTED);
        assert_eq!(ErrorCode::ConfigValidationError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::IoError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::config_not_found("/etc/photogate.toml").with_context("While loading");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.suggestion.is_some());
        assert_eq!(
            err.detail(),
            "While loading: Configuration file not found: /etc/photogate.toml"
        );
    }

    #[test]
    fn test_missing_image_type_lists_names() {
        let err = Error::missing_image_type(&["生活照", "证件照"]);
        assert_eq!(err.message, "missing image type");
        assert_eq!(
            err.suggestion.as_deref(),
            Some("provide an image type, one of: 生活照, 证件照")
        );
    }

    #[test]
    fn test_input_too_large_detail() {
        let measured = Error::input_too_large(Some(2048), 1024);
        assert_eq!(measured.code.to_string(), "E4003");
        assert_eq!(
            measured.suggestion.as_deref(),
            Some("file is 2048 bytes, limit is 1024 bytes")
        );

        let streamed = Error::input_too_large(None, 1024);
        assert_eq!(
            streamed.suggestion.as_deref(),
            Some("file exceeds the limit of 1024 bytes")
        );
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::InputTooLarge).unwrap();
        assert_eq!(json, "\"INPUT_TOO_LARGE\"");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.source.is_some());
    }
}
