//! The validation engine.

use crate::report::ImageInfo;
use crate::{check_transparency, decode, DecodedImage, Rule, RuleRegistry, ValidationReport};

/// Checks images against the profiles of a [`RuleRegistry`].
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ImageValidator {
    rules: RuleRegistry,
}

impl ImageValidator {
    /// Validator over the given rules.
    pub fn new(rules: RuleRegistry) -> Self {
        Self { rules }
    }

    /// Rules this validator checks against.
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Validate `data` against the profile called `profile`.
    ///
    /// Always returns a report: unknown profiles, undecodable bytes and rule
    /// violations all come back as failing reports.
    ///
    /// ```
    /// use photogate_image::ImageValidator;
    ///
    /// let report = ImageValidator::default().validate(b"not an image", "证件照");
    /// assert!(!report.success());
    /// assert_eq!(report.message(), "image processing failed");
    /// ```
    #[tracing::instrument(level = "debug", skip(self, data), fields(bytes = data.len()))]
    pub fn validate(&self, data: &[u8], profile: &str) -> ValidationReport {
        let Some(rule) = self.rules.lookup(profile) else {
            tracing::debug!("Unknown profile");
            return ValidationReport::unsupported_type(profile, self.rules.known_names());
        };

        let image = match decode(data) {
            Ok(image) => image,
            Err(err) => {
                tracing::debug!(error = %err, "Decode failed");
                return ValidationReport::processing_failed(err);
            }
        };

        let (errors, transparent_pixels) = run_checks(&image, rule);
        let mut info = ImageInfo {
            format: image.format.tag().to_string(),
            size: image.size_string(),
            mode: image.mode.as_str().to_string(),
            transparent_pixels: None,
        };

        if errors.is_empty() {
            tracing::debug!("All checks passed");
            info.transparent_pixels = transparent_pixels;
            ValidationReport::passed(info)
        } else {
            tracing::debug!(violations = errors.len(), "Checks failed");
            ValidationReport::failed(errors, info)
        }
    }
}

/// Run every check, in order, without stopping at the first violation.
///
/// Returns the violations and, when the rule asked for it, the transparent
/// pixel count.
fn run_checks(image: &DecodedImage, rule: &Rule) -> (Vec<String>, Option<u64>) {
    let mut errors = Vec::new();

    let format = image.format.tag();
    if format != rule.format {
        errors.push(format!(
            "format error: currently {format}, should be {}",
            rule.format
        ));
    }

    if (image.width, image.height) != (rule.width, rule.height) {
        errors.push(format!(
            "size error: currently {}, should be {}",
            image.size_string(),
            rule.size_string()
        ));
    }

    let mut transparent_pixels = None;
    if rule.transparency_required {
        let transparency = check_transparency(image);
        if !transparency.is_transparent {
            errors.push(
                "transparency error: non-transparent background (transparent pixel ratio < 0.1%)"
                    .to_string(),
            );
        }
        transparent_pixels = Some(transparency.transparent_pixels);
    }

    (errors, transparent_pixels)
}
