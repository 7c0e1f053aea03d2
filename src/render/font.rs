//! Bitmap text for badges and text pops.
//!
//! Uses the Spleen 12x24 bitmap font, scaled with nearest neighbor to the
//! requested pixel height. Glyph advance is half the height (the font's 1:2
//! cell ratio).

use image::Rgba;
use spleen_font::{FONT_12X24, PSF2Font};

use super::surface::Frame;

pub const GLYPH_WIDTH: usize = 12;
pub const GLYPH_HEIGHT: usize = 24;

/// Horizontal advance of one character at `height` pixels.
pub fn char_width(height: i64) -> i64 {
    let height = height.max(0);
    height / 2 + height % 2
}

/// Width of a single line of text at `height` pixels.
pub fn text_width(text: &str, height: i64) -> i64 {
    (text.chars().count() as i64).saturating_mul(char_width(height))
}

/// Largest glyph height at which `text` fits in `max_width`, capped at `max_height`.
pub fn fit_height(text: &str, max_width: i64, max_height: i64) -> i64 {
    let chars = text.chars().count() as i64;
    if chars == 0 {
        return max_height.max(0);
    }
    // char_width(h) = ceil(h / 2), so h <= 2 * max_width / chars
    let by_width = max_width.saturating_mul(2) / chars;
    by_width.min(max_height).max(0)
}

/// Draw one line of text with its top-left corner at `(x, y)`.
pub fn draw_text(frame: &mut Frame<'_>, x: i64, y: i64, text: &str, height: i64, color: Rgba<u8>) {
    if height <= 0 || text.is_empty() {
        return;
    }
    let mut font = PSF2Font::new(FONT_12X24).ok();
    let advance = char_width(height);

    for (i, ch) in text.chars().enumerate() {
        let bitmap = match font.as_mut() {
            Some(font) => glyph(font, ch),
            None => box_glyph(),
        };
        let gx = x.saturating_add((i as i64).saturating_mul(advance));
        frame.fill_mask(gx, y, advance, height, color, |px, py| {
            // Widened so glyph boxes of any size scale without overflow
            let sx = (px as i128 * GLYPH_WIDTH as i128 / advance as i128) as usize;
            let sy = (py as i128 * GLYPH_HEIGHT as i128 / height as i128) as usize;
            sx < GLYPH_WIDTH
                && bitmap
                    .get(sy * GLYPH_WIDTH + sx)
                    .is_some_and(|&on| on == 1)
        });
    }
}

/// 12x24 bitmap for `ch`; each byte is 0 (off) or 1 (on).
fn glyph(font: &mut PSF2Font, ch: char) -> Vec<u8> {
    if ch == ' ' {
        return vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
    }
    let mut bitmap = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
    let utf8 = ch.to_string();
    match font.glyph_for_utf8(utf8.as_bytes()) {
        Some(spleen_glyph) => {
            for (row_y, row) in spleen_glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    let idx = row_y * GLYPH_WIDTH + col_x;
                    if col_x < GLYPH_WIDTH && idx < bitmap.len() {
                        bitmap[idx] = if on { 1 } else { 0 };
                    }
                }
            }
            bitmap
        }
        None => box_glyph(),
    }
}

/// Outline box for characters the font does not cover.
fn box_glyph() -> Vec<u8> {
    let mut bitmap = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
    for y in 2..GLYPH_HEIGHT - 2 {
        for x in 1..GLYPH_WIDTH - 1 {
            if y == 2 || y == GLYPH_HEIGHT - 3 || x == 1 || x == GLYPH_WIDTH - 2 {
                bitmap[y * GLYPH_WIDTH + x] = 1;
            }
        }
    }
    bitmap
}
