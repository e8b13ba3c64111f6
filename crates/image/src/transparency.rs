//! Transparent background detection.

use crate::{ColorMode, DecodedImage};
use serde::{Deserialize, Serialize};

/// Fully transparent pixels must make up strictly more than this share of
/// the image, in parts per thousand (1 = 0.1%).
pub const MIN_TRANSPARENT_PER_MILLE: u64 = 1;

/// Outcome of [`check_transparency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transparency {
    /// Background counts as transparent
    pub is_transparent: bool,
    /// Pixels with alpha exactly 0
    pub transparent_pixels: u64,
}

impl Transparency {
    const OPAQUE: Self = Self {
        is_transparent: false,
        transparent_pixels: 0,
    };
}

/// Classify an image's background.
///
/// Palette images only count when the palette has a transparency key; modes
/// without alpha never count. Anything unexpected while reading alpha yields
/// "not transparent" with a zero count instead of an error.
pub fn check_transparency(image: &DecodedImage) -> Transparency {
    match image.mode {
        ColorMode::Palette if !image.palette_transparency => {
            tracing::debug!("Palette has no transparency key");
            return Transparency::OPAQUE;
        }
        ColorMode::Palette => {}
        mode if !mode.has_alpha() => {
            tracing::debug!(mode = %mode, "Mode has no alpha channel");
            return Transparency::OPAQUE;
        }
        _ => {}
    }

    let Some(count) = image.fully_transparent_pixels() else {
        tracing::debug!(
            mode = %image.mode,
            color = ?image.pixels.color(),
            "Decoded buffer has no alpha channel, treating as opaque"
        );
        return Transparency::OPAQUE;
    };

    let total = image.pixel_count();
    if total == 0 {
        tracing::debug!("Image has no pixels, treating as opaque");
        return Transparency::OPAQUE;
    }

    // count / total > per_mille / 1000, without floating point
    let is_transparent =
        u128::from(count) * 1000 > u128::from(total) * u128::from(MIN_TRANSPARENT_PER_MILLE);

    tracing::debug!(
        transparent_pixels = count,
        total_pixels = total,
        ratio = count as f64 / total as f64,
        is_transparent,
        "Transparency scanned"
    );

    Transparency {
        is_transparent,
        transparent_pixels: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use crate::test_support::{palette_png, rgb_png, rgba16_png, rgba_png};
    use image::{DynamicImage, GrayAlphaImage, LumaA, RgbImage};

    fn decoded(data: &[u8]) -> DecodedImage {
        decode(data).unwrap()
    }

    #[test]
    fn test_exact_threshold_is_not_enough() {
        // 1000 pixels, 1 transparent = exactly 0.1%
        let result = check_transparency(&decoded(&rgba_png(100, 10, 1)));
        assert!(!result.is_transparent);
        assert_eq!(result.transparent_pixels, 1);
    }

    #[test]
    fn test_above_threshold() {
        let result = check_transparency(&decoded(&rgba_png(100, 10, 2)));
        assert!(result.is_transparent);
        assert_eq!(result.transparent_pixels, 2);
    }

    #[test]
    fn test_rgb_is_never_transparent() {
        let result = check_transparency(&decoded(&rgb_png(10, 10)));
        assert_eq!(result, Transparency::default());
    }

    #[test]
    fn test_partial_alpha_does_not_count() {
        let mut img = GrayAlphaImage::from_pixel(10, 10, LumaA([0, 255]));
        for x in 0..10 {
            img.put_pixel(x, 0, LumaA([0, 1]));
        }
        let image = DecodedImage {
            format: crate::ImageFormat::Png,
            width: 10,
            height: 10,
            mode: ColorMode::LumaAlpha,
            palette_transparency: false,
            pixels: DynamicImage::ImageLumaA8(img),
        };
        assert_eq!(check_transparency(&image).transparent_pixels, 0);
    }

    #[test]
    fn test_sixteen_bit_near_zero_alpha_is_opaque() {
        // every pixel at alpha 1/65535
        let result = check_transparency(&decoded(&rgba16_png(10, 10, 100, 1)));
        assert!(!result.is_transparent);
        assert_eq!(result.transparent_pixels, 0);
    }

    #[test]
    fn test_palette_without_key_skips_scan() {
        // every pixel would be index 0, but nothing marks it transparent
        let data = palette_png(10, 10, &[[0, 0, 0]], None, |_, _| 0);
        let result = check_transparency(&decoded(&data));
        assert_eq!(result, Transparency::default());
    }

    #[test]
    fn test_palette_with_key_is_scanned() {
        let data = palette_png(10, 10, &[[0, 0, 0], [9, 9, 9]], Some(&[0]), |x, y| {
            u8::from(!(x == 0 && y == 0))
        });
        let result = check_transparency(&decoded(&data));
        assert!(result.is_transparent);
        assert_eq!(result.transparent_pixels, 1);
    }

    #[test]
    fn test_mode_buffer_mismatch_is_swallowed() {
        let image = DecodedImage {
            format: crate::ImageFormat::Png,
            width: 4,
            height: 4,
            mode: ColorMode::Rgba,
            palette_transparency: false,
            pixels: DynamicImage::ImageRgb8(RgbImage::new(4, 4)),
        };
        assert_eq!(check_transparency(&image), Transparency::default());
    }

    #[test]
    fn test_empty_image_is_swallowed() {
        let image = DecodedImage {
            format: crate::ImageFormat::Png,
            width: 0,
            height: 0,
            mode: ColorMode::Rgba,
            palette_transparency: false,
            pixels: DynamicImage::ImageRgba8(image::RgbaImage::new(0, 0)),
        };
        assert_eq!(check_transparency(&image), Transparency::default());
    }
}
