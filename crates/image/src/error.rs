//! Error types for the image crate.

use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors raised while turning bytes into a [`DecodedImage`](crate::DecodedImage).
///
/// These never escape [`ImageValidator::validate`](crate::ImageValidator::validate);
/// the validator folds them into a failing report.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Bytes do not start with any known image signature
    #[error("cannot identify image file")]
    UnknownFormat,

    /// Invalid image data
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// Recognised container with no decoder compiled in
    #[error("no decoder available for {0} images")]
    UnsupportedFormat(crate::ImageFormat),

    /// Decoder rejected the data
    #[error("decode error: {0}")]
    DecodeError(#[from] image::ImageError),
}
