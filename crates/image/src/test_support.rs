//! In-memory image fixtures.

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Write};

use crate::metadata::PNG_SIGNATURE;

fn encode(image: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

/// RGBA PNG whose first `transparent` pixels (row-major) have alpha 0 and
/// the rest are opaque white.
pub fn rgba_png(width: u32, height: u32, transparent: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if y * width + x < transparent {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    encode(&DynamicImage::ImageRgba8(img), ImageOutputFormat::Png)
}

/// 16-bit RGBA PNG whose first `matching` pixels carry alpha `alpha` and
/// the rest are fully opaque.
pub fn rgba16_png(width: u32, height: u32, matching: u32, alpha: u16) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u16>, Vec<u16>> = ImageBuffer::from_fn(width, height, |x, y| {
        if y * width + x < matching {
            Rgba([0, 0, 0, alpha])
        } else {
            Rgba([u16::MAX; 4])
        }
    });
    encode(&DynamicImage::ImageRgba16(img), ImageOutputFormat::Png)
}

/// Opaque RGB PNG.
pub fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
    encode(&DynamicImage::ImageRgb8(img), ImageOutputFormat::Png)
}

/// Baseline JPEG.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 100, 50]));
    encode(&DynamicImage::ImageRgb8(img), ImageOutputFormat::Jpeg(90))
}

/// 8-bit indexed PNG assembled chunk by chunk; the `image` encoder cannot
/// write palettes.
pub fn palette_png(
    width: u32,
    height: u32,
    palette: &[[u8; 3]],
    transparency: Option<&[u8]>,
    index_at: impl Fn(u32, u32) -> u8,
) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // bit depth 8, colour type 3, deflate, adaptive filtering, no interlace
    ihdr.extend_from_slice(&[8, 3, 0, 0, 0]);
    write_chunk(&mut out, b"IHDR", &ihdr);

    let plte: Vec<u8> = palette.iter().flatten().copied().collect();
    write_chunk(&mut out, b"PLTE", &plte);

    if let Some(alpha) = transparency {
        write_chunk(&mut out, b"tRNS", alpha);
    }

    let mut raw = Vec::with_capacity(((width + 1) * height) as usize);
    for y in 0..height {
        raw.push(0); // filter: none
        raw.extend((0..width).map(|x| index_at(x, y)));
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    write_chunk(&mut out, b"IDAT", &encoder.finish().unwrap());

    write_chunk(&mut out, b"IEND", &[]);
    out
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}
