//! Image profile validation.
//!
//! Checks that an uploaded image matches a named profile before it enters a
//! compositing pipeline:
//! - exact format tag (e.g. `"PNG"`)
//! - exact pixel dimensions
//! - a transparent background: strictly more than 0.1% of pixels with alpha 0
//!
//! ```no_run
//! use photogate_image::{ImageValidator, RuleRegistry};
//!
//! let validator = ImageValidator::new(RuleRegistry::builtin());
//! let bytes = std::fs::read("portrait.png").unwrap();
//! let report = validator.validate(&bytes, "证件照");
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```

#![warn(missing_docs)]

mod decode;
mod detect;
mod error;
mod metadata;
mod report;
mod rules;
mod transparency;
mod validator;

#[cfg(test)]
mod test_support;

pub use decode::{decode, ColorMode, DecodedImage};
pub use detect::{detect_format, ImageFormat};
pub use error::{ImageError, Result};
pub use metadata::{inspect_png, PngHeader, PNG_SIGNATURE};
pub use report::{ImageInfo, ValidationReport};
pub use rules::{Rule, RuleRegistry};
pub use transparency::{check_transparency, Transparency, MIN_TRANSPARENT_PER_MILLE};
pub use validator::ImageValidator;
