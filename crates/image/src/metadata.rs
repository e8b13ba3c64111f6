//! PNG header inspection.
//!
//! The decoder expands palette images to RGB/RGBA before we ever see the
//! pixels, so the stored colour type and whether a palette declares a
//! transparency key are read straight from the chunk stream.

use crate::ColorMode;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Facts from the chunks preceding the first `IDAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngHeader {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per sample (or per palette index)
    pub bit_depth: u8,
    /// Raw IHDR colour type
    pub color_type: u8,
    /// A `PLTE` chunk was present
    pub has_palette: bool,
    /// A `tRNS` chunk was present
    pub has_transparency_key: bool,
}

impl PngHeader {
    /// Colour mode named after the stored layout, or `None` for an invalid
    /// colour type.
    pub fn color_mode(&self) -> Option<ColorMode> {
        match self.color_type {
            0 => Some(ColorMode::Luma),
            2 => Some(ColorMode::Rgb),
            3 => Some(ColorMode::Palette),
            4 => Some(ColorMode::LumaAlpha),
            6 => Some(ColorMode::Rgba),
            _ => None,
        }
    }
}

/// Read the IHDR and scan ancillary chunks up to the image data.
///
/// Returns `None` when the data is not a PNG or the header is truncated.
pub fn inspect_png(data: &[u8]) -> Option<PngHeader> {
    // signature + IHDR length/type + 13 bytes of IHDR data
    if data.len() < 29 || !data.starts_with(&PNG_SIGNATURE) {
        return None;
    }
    if &data[12..16] != b"IHDR" {
        return None;
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    let mut header = PngHeader {
        width,
        height,
        bit_depth: data[24],
        color_type: data[25],
        has_palette: false,
        has_transparency_key: false,
    };

    let mut offset = PNG_SIGNATURE.len();
    while offset + 8 <= data.len() {
        let length = u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as usize;

        match &data[offset + 4..offset + 8] {
            b"PLTE" => header.has_palette = true,
            b"tRNS" => header.has_transparency_key = true,
            // tRNS must precede the image data
            b"IDAT" | b"IEND" => break,
            _ => {}
        }

        // length + type + data + crc
        offset = match offset.checked_add(12).and_then(|o| o.checked_add(length)) {
            Some(next) => next,
            None => break,
        };
    }

    Some(header)
}
