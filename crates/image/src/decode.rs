//! Decoding raw bytes into a [`DecodedImage`].

use crate::metadata::inspect_png;
use crate::{detect_format, ImageError, ImageFormat, Result};
use image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel layout of an image as stored, before any decoder expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    /// Grayscale
    #[serde(rename = "L")]
    Luma,
    /// Grayscale with alpha
    #[serde(rename = "LA")]
    LumaAlpha,
    /// Truecolor
    #[serde(rename = "RGB")]
    Rgb,
    /// Truecolor with alpha
    #[serde(rename = "RGBA")]
    Rgba,
    /// Indexed palette
    #[serde(rename = "P")]
    Palette,
}

impl ColorMode {
    /// Short mode name as shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Luma => "L",
            ColorMode::LumaAlpha => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Palette => "P",
        }
    }

    /// Whether every pixel carries its own alpha sample.
    pub fn has_alpha(&self) -> bool {
        matches!(self, ColorMode::LumaAlpha | ColorMode::Rgba)
    }

    fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => ColorMode::Luma,
            ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            other if other.has_alpha() => ColorMode::Rgba,
            _ => ColorMode::Rgb,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image decoded for the duration of one validation.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Container format the bytes were in
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Stored channel layout
    pub mode: ColorMode,
    /// Palette declares a fully transparent entry
    pub palette_transparency: bool,
    /// Decoded pixels; palettes are already expanded to RGB or RGBA
    pub pixels: DynamicImage,
}

impl DecodedImage {
    /// `"WIDTHxHEIGHT"`
    pub fn size_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Total pixel count
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Number of pixels whose alpha sample is exactly zero.
    ///
    /// `None` when the decoded buffer has no alpha channel.
    pub fn fully_transparent_pixels(&self) -> Option<u64> {
        match &self.pixels {
            DynamicImage::ImageLumaA8(buf) => Some(count_zero_alpha(buf.as_raw(), 2)),
            DynamicImage::ImageLumaA16(buf) => Some(count_zero_alpha(buf.as_raw(), 2)),
            DynamicImage::ImageRgba8(buf) => Some(count_zero_alpha(buf.as_raw(), 4)),
            DynamicImage::ImageRgba16(buf) => Some(count_zero_alpha(buf.as_raw(), 4)),
            DynamicImage::ImageRgba32F(buf) => Some(count_zero_alpha(buf.as_raw(), 4)),
            _ => None,
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn count_zero_alpha<T>(samples: &[T], channels: usize) -> u64
where
    T: Copy + Default + PartialEq,
{
    let zero = T::default();
    samples
        .chunks_exact(channels)
        .filter(|px| px[channels - 1] == zero)
        .count() as u64
}

#[cfg(feature = "parallel")]
fn count_zero_alpha<T>(samples: &[T], channels: usize) -> u64
where
    T: Copy + Default + PartialEq + Send + Sync,
{
    use rayon::prelude::*;

    let zero = T::default();
    samples
        .par_chunks_exact(channels)
        .filter(|px| px[channels - 1] == zero)
        .count() as u64
}

/// Decode image bytes.
///
/// The container is identified from its signature; PNG files additionally
/// have their header inspected so palette images keep their `P` mode and
/// transparency key.
pub fn decode(data: &[u8]) -> Result<DecodedImage> {
    let format = detect_format(data)?;
    let codec = format.codec().ok_or(ImageError::UnsupportedFormat(format))?;
    let pixels = image::load_from_memory_with_format(data, codec)?;

    let header = match format {
        ImageFormat::Png => inspect_png(data),
        _ => None,
    };
    let (mode, palette_transparency) =
        match header.and_then(|h| h.color_mode().map(|mode| (mode, h.has_transparency_key))) {
            Some((mode, key)) => (mode, mode == ColorMode::Palette && key),
            None => (ColorMode::from_color_type(pixels.color()), false),
        };

    tracing::trace!(
        format = %format,
        width = pixels.width(),
        height = pixels.height(),
        mode = %mode,
        palette_transparency,
        "Decoded image"
    );

    Ok(DecodedImage {
        format,
        width: pixels.width(),
        height: pixels.height(),
        mode,
        palette_transparency,
        pixels,
    })
}
