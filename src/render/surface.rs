//! Pixel surface and translated drawing frames.
//!
//! A [`Surface`] is an opaque RGBA buffer for a whole page. Drawing happens
//! through a [`Frame`], a mutable view whose coordinate origin has been moved
//! to some point on the surface. Frames clip to the surface bounds only, so a
//! pop may paint outside its own box, exactly like a translated canvas.
//!
//! ```text
//! surface (0,0) ──────────────────────────┐
//! │                                       │
//! │      frame origin (ox, oy)            │
//! │      ┌─────────────┐                  │
//! │      │ (0,0) local │                  │
//! │      └─────────────┘                  │
//! └───────────────────────────────────────┘
//! ```

use image::{Rgba, RgbaImage};

use super::RenderError;

/// Largest surface that will be allocated (about 1 GiB of RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 1 << 28;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Parse a CSS-style color.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `white`, `black` and
/// `transparent`. Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Rgba<u8>> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "white" => return Some(WHITE),
        "black" => return Some(BLACK),
        "transparent" => return Some(TRANSPARENT),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 16 + v;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}

/// Parse `s`, or fall back to `default` (which must itself parse) with a warning.
pub fn color_or(s: &str, default: &str) -> Rgba<u8> {
    parse_color(s).unwrap_or_else(|| {
        tracing::warn!(color = %s, fallback = %default, "unparsable color");
        parse_color(default).unwrap_or(BLACK)
    })
}

/// Opaque page-sized pixel buffer.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Allocate a surface filled with opaque white.
    ///
    /// Fails with [`RenderError::SurfaceUnavailable`] when either dimension
    /// is not positive or the pixel count exceeds [`MAX_SURFACE_PIXELS`].
    pub fn acquire(width: i64, height: i64) -> Result<Self, RenderError> {
        let unavailable = RenderError::SurfaceUnavailable { width, height };
        if width <= 0 || height <= 0 {
            return Err(unavailable);
        }
        let (w, h) = (width as u64, height as u64);
        if w > u32::MAX as u64 || h > u32::MAX as u64 || w * h > MAX_SURFACE_PIXELS {
            return Err(unavailable);
        }
        Ok(Self {
            image: RgbaImage::from_pixel(w as u32, h as u32, WHITE),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at surface coordinates, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// A drawing frame with its origin at `(x, y)` in surface pixels.
    pub fn frame_at(&mut self, x: i64, y: i64) -> Frame<'_> {
        Frame {
            image: &mut self.image,
            origin_x: x,
            origin_y: y,
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Mutable drawing view translated to a local origin.
///
/// The translation lives only as long as the frame; dropping it leaves the
/// surface with no residual state.
pub struct Frame<'a> {
    image: &'a mut RgbaImage,
    origin_x: i64,
    origin_y: i64,
}

impl<'a> Frame<'a> {
    /// Origin of this frame in surface pixels.
    pub fn origin(&self) -> (i64, i64) {
        (self.origin_x, self.origin_y)
    }

    /// A nested frame translated by `(dx, dy)` from this one.
    pub fn translate(&mut self, dx: i64, dy: i64) -> Frame<'_> {
        Frame {
            image: &mut *self.image,
            origin_x: self.origin_x.saturating_add(dx),
            origin_y: self.origin_y.saturating_add(dy),
        }
    }

    /// Composite one pixel (source-over) at local coordinates.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        let sx = self.origin_x.saturating_add(x);
        let sy = self.origin_y.saturating_add(y);
        if sx < 0 || sy < 0 || sx >= self.image.width() as i64 || sy >= self.image.height() as i64
        {
            return;
        }
        let alpha = color[3] as u32;
        if alpha == 0 {
            return;
        }
        let dst = self.image.get_pixel_mut(sx as u32, sy as u32);
        if alpha == 255 {
            *dst = Rgba([color[0], color[1], color[2], 255]);
            return;
        }
        for c in 0..3 {
            let blended = (color[c] as u32 * alpha + dst[c] as u32 * (255 - alpha) + 127) / 255;
            dst[c] = blended as u8;
        }
        dst[3] = 255;
    }

    /// Fill an axis-aligned rectangle in local coordinates.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, color: Rgba<u8>) {
        self.fill_mask(x, y, width, height, color, |_, _| true);
    }

    /// Draw a rectangle outline of the given thickness, inside the rectangle.
    pub fn stroke_rect(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        thickness: i64,
        color: Rgba<u8>,
    ) {
        let t = thickness.max(1);
        self.fill_mask(x, y, width, height, color, |px, py| {
            px < t || py < t || px >= width.saturating_sub(t) || py >= height.saturating_sub(t)
        });
    }

    /// Fill the pixels of a `width x height` box at `(x, y)` for which
    /// `inside(px, py)` holds, with `px`/`py` relative to the box.
    pub fn fill_mask(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        color: Rgba<u8>,
        inside: impl Fn(i64, i64) -> bool,
    ) {
        let (x0, y0, x1, y1) = self.clip(x, y, width, height);
        for ly in y0..y1 {
            for lx in x0..x1 {
                if inside(lx.saturating_sub(x), ly.saturating_sub(y)) {
                    self.blend_pixel(lx, ly, color);
                }
            }
        }
    }

    /// Composite an image with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, x: i64, y: i64, image: &RgbaImage) {
        self.draw_image_masked(x, y, image, |_, _| true);
    }

    /// Composite the pixels of `image` for which `inside(px, py)` holds.
    pub fn draw_image_masked(
        &mut self,
        x: i64,
        y: i64,
        image: &RgbaImage,
        inside: impl Fn(i64, i64) -> bool,
    ) {
        let (x0, y0, x1, y1) = self.clip(x, y, image.width() as i64, image.height() as i64);
        for ly in y0..y1 {
            for lx in x0..x1 {
                let (px, py) = (lx.saturating_sub(x), ly.saturating_sub(y));
                if inside(px, py) {
                    let color = *image.get_pixel(px as u32, py as u32);
                    self.blend_pixel(lx, ly, color);
                }
            }
        }
    }

    /// Whether any pixel of a local box lands on the surface.
    pub fn is_visible(&self, x: i64, y: i64, width: i64, height: i64) -> bool {
        let (x0, y0, x1, y1) = self.clip(x, y, width, height);
        x0 < x1 && y0 < y1
    }

    /// Intersect a local box with the surface, in local coordinates.
    ///
    /// Saturates, so origins and sizes anywhere in `i64` are safe.
    fn clip(&self, x: i64, y: i64, width: i64, height: i64) -> (i64, i64, i64, i64) {
        let min_x = 0i64.saturating_sub(self.origin_x);
        let min_y = 0i64.saturating_sub(self.origin_y);
        let max_x = (self.image.width() as i64).saturating_sub(self.origin_x);
        let max_y = (self.image.height() as i64).saturating_sub(self.origin_y);
        (
            x.max(min_x),
            y.max(min_y),
            x.saturating_add(width.max(0)).min(max_x),
            y.saturating_add(height.max(0)).min(max_y),
        )
    }
}
