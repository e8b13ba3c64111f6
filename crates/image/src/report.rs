//! Validation reports.

use serde::{Deserialize, Serialize};

pub(crate) const MSG_PASSED: &str = "check passed";
pub(crate) const MSG_FAILED: &str = "check failed";
pub(crate) const MSG_PROCESSING_FAILED: &str = "image processing failed";

/// What was observed about a decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Format tag, e.g. `"PNG"`
    pub format: String,
    /// `"WIDTHxHEIGHT"`
    pub size: String,
    /// Colour mode, e.g. `"RGBA"` or `"P"`
    pub mode: String,
    /// Fully transparent pixel count; only on passing reports whose rule
    /// required transparency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent_pixels: Option<u64>,
}

/// Result of validating one image against one profile.
///
/// `success` is true exactly when `errors` is empty; the constructors keep
/// that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    success: bool,
    message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_info: Option<ImageInfo>,
}

impl ValidationReport {
    /// Every check passed.
    pub fn passed(info: ImageInfo) -> Self {
        Self {
            success: true,
            message: MSG_PASSED.to_string(),
            errors: Vec::new(),
            image_info: Some(info),
        }
    }

    /// One or more rule violations.
    ///
    /// # Panics
    /// Debug builds assert `errors` is non-empty.
    pub fn failed(errors: Vec<String>, info: ImageInfo) -> Self {
        debug_assert!(!errors.is_empty(), "failed report without errors");
        Self {
            success: false,
            message: MSG_FAILED.to_string(),
            errors,
            image_info: Some(info),
        }
    }

    /// The profile name is not registered.
    pub fn unsupported_type<'a>(name: &str, known: impl IntoIterator<Item = &'a str>) -> Self {
        let known: Vec<&str> = known.into_iter().collect();
        Self::rejected(
            format!("unsupported image type: {name}"),
            format!("supported types: {}", known.join(", ")),
        )
    }

    /// The bytes could not be decoded.
    pub fn processing_failed(detail: impl std::fmt::Display) -> Self {
        Self::rejected(MSG_PROCESSING_FAILED, format!("error detail: {detail}"))
    }

    /// A failure with a single error and no image information.
    ///
    /// Hosts use this for input they refuse before validation (empty upload,
    /// missing profile name) so every outcome has the same shape.
    pub fn rejected(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: vec![error.into()],
            image_info: None,
        }
    }

    /// All checks passed
    pub fn success(&self) -> bool {
        self.success
    }

    /// Summary message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Violations in check order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Observed image properties, when decoding succeeded
    pub fn image_info(&self) -> Option<&ImageInfo> {
        self.image_info.as_ref()
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({
            "success": self.success,
            "message": self.message,
            "errors": self.errors,
        }))
    }
}
