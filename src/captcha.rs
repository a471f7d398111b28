//! Image verification code rendering.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use rand::Rng;

/// Rendering failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("glyph {0:?} is not renderable")]
    UnknownGlyph(char),
}

/// Capability to rasterize an image verification code.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, code: &str) -> Result<Vec<u8>, RenderError>;
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const SCALE: u32 = 6;
const MARGIN: u32 = 10;
const SPACING: u32 = 8;
const NOISE_DOTS: usize = 120;

/// 5x7 bitmaps for `0-9A-Z`, one row per byte, low 5 bits used.
/// Lowercase input folds to uppercase.
const GLYPHS: [[u8; 7]; 36] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9
    [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11], // A
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C
    [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C], // D
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11], // M
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z
];

fn glyph(ch: char) -> Result<&'static [u8; 7], RenderError> {
    let folded = ch.to_ascii_uppercase();
    let index = match folded {
        '0'..='9' => folded as usize - '0' as usize,
        'A'..='Z' => folded as usize - 'A' as usize + 10,
        _ => return Err(RenderError::UnknownGlyph(ch)),
    };

    Ok(&GLYPHS[index])
}

/// Default renderer: scaled bitmap glyphs over a speckled background.
#[derive(Debug, Default)]
pub struct GlyphRenderer;

impl ImageRenderer for GlyphRenderer {
    fn render(&self, code: &str) -> Result<Vec<u8>, RenderError> {
        let count = code.chars().count() as u32;
        let width = (MARGIN * 2
            + count * GLYPH_WIDTH * SCALE
            + count.saturating_sub(1) * SPACING)
            .max(1);
        let height = MARGIN * 2 + GLYPH_HEIGHT * SCALE;
        let mut img = RgbImage::from_pixel(width, height, Rgb([245, 245, 245]));

        let mut rng = rand::thread_rng();
        for (position, ch) in code.chars().enumerate() {
            let rows = glyph(ch)?;
            let origin_x =
                MARGIN + position as u32 * (GLYPH_WIDTH * SCALE + SPACING);
            let ink = Rgb([
                rng.gen_range(20..120u8),
                rng.gen_range(20..120u8),
                rng.gen_range(20..120u8),
            ]);

            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if *bits & (0b1_0000 >> col) == 0 {
                        continue;
                    }
                    for dy in 0..SCALE {
                        for dx in 0..SCALE {
                            img.put_pixel(
                                origin_x + col * SCALE + dx,
                                MARGIN + row as u32 * SCALE + dy,
                                ink,
                            );
                        }
                    }
                }
            }
        }

        // Speckle to deter naive OCR.
        for _ in 0..NOISE_DOTS {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let shade = rng.gen_range(60..200u8);
            img.put_pixel(x, y, Rgb([shade, shade, shade]));
        }

        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Test renderer exposing the code as the response body.
#[cfg(test)]
pub struct EchoRenderer;

#[cfg(test)]
impl ImageRenderer for EchoRenderer {
    fn render(&self, code: &str) -> Result<Vec<u8>, RenderError> {
        Ok(code.as_bytes().to_vec())
    }
}
