//! Image format detection from magic bytes.

use crate::{ImageError, Result};
use std::fmt;

/// Image container formats.
///
/// Serialized and displayed as the upper-case tag rules are written against
/// (`"PNG"`, `"JPEG"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image
    Gif,
    /// WebP image
    WebP,
    /// AVIF image
    Avif,
    /// BMP image
    Bmp,
    /// TIFF image
    Tiff,
    /// HEIC/HEIF image
    Heic,
}

impl ImageFormat {
    /// Format tag compared against [`Rule::format`](crate::Rule::format).
    pub fn tag(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Gif => "GIF",
            ImageFormat::WebP => "WEBP",
            ImageFormat::Avif => "AVIF",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Heic => "HEIC",
        }
    }

    /// Decoder to hand the bytes to, if one is compiled in.
    pub(crate) fn codec(&self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Avif | ImageFormat::Heic => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Detect image format from magic bytes.
///
/// # Example
/// ```
/// use photogate_image::{detect_format, ImageFormat};
///
/// let png_data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert!(matches!(detect_format(&png_data), Ok(ImageFormat::Png)));
///
/// assert!(detect_format(b"not an image").is_err());
/// ```
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.is_empty() {
        return Err(ImageError::InvalidData("empty input".into()));
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Ok(ImageFormat::Jpeg);
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&crate::metadata::PNG_SIGNATURE) {
        return Ok(ImageFormat::Png);
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Ok(ImageFormat::Gif);
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Ok(ImageFormat::WebP);
    }

    // BMP: BM
    if data.starts_with(b"BM") {
        return Ok(ImageFormat::Bmp);
    }

    // TIFF: II or MM (little/big endian)
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
        return Ok(ImageFormat::Tiff);
    }

    // ISO-BMFF: ....ftyp<brand>
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        match &data[8..12] {
            b"avif" | b"avis" | b"mif1" => return Ok(ImageFormat::Avif),
            b"heic" | b"heix" => return Ok(ImageFormat::Heic),
            _ => {}
        }
    }

    Err(ImageError::UnknownFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(detect_format(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        assert_eq!(detect_format(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_gif() {
        let data = b"GIF89a\x00\x00\x00\x00";
        assert_eq!(detect_format(data).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_detect_webp() {
        let data = b"RIFF\x00\x00\x00\x00WEBP";
        assert_eq!(detect_format(data).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_detect_heic() {
        let data = b"\x00\x00\x00\x18ftypheic";
        assert_eq!(detect_format(data).unwrap(), ImageFormat::Heic);
    }

    #[test]
    fn test_unknown_format() {
        let data = [0x00, 0x00, 0x00, 0x00];
        assert!(matches!(detect_format(&data), Err(ImageError::UnknownFormat)));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(detect_format(&[]), Err(ImageError::InvalidData(_))));
    }

    #[test]
    fn test_tags_are_case_exact() {
        assert_eq!(ImageFormat::Png.tag(), "PNG");
        assert_eq!(ImageFormat::Jpeg.to_string(), "JPEG");
        assert_eq!(serde_json::to_string(&ImageFormat::WebP).unwrap(), "\"WEBP\"");
    }

    #[test]
    fn test_no_codec_for_heif_family() {
        assert!(ImageFormat::Avif.codec().is_none());
        assert!(ImageFormat::Heic.codec().is_none());
        assert_eq!(ImageFormat::Png.codec(), Some(image::ImageFormat::Png));
    }
}
