//! Drawing custom badges into a host area.
//!
//! A badge is sized in millimeters and anchored inside its host (usually
//! the pop it is attached to) by `badgeAlign` / `badgeVerticalAlign`:
//!
//! ```text
//! ┌ left/top ──── center/top ──── right/top ┐
//! │                                          │
//! left/middle     center/middle   right/middle
//! │                                          │
//! └ left/bottom ─ center/bottom ─ right/bottom┘
//! ```
//!
//! Paint order inside the badge box: fill (text badges) or image (image
//! badges), then text, then border. The border is drawn inside the shape.

use image::imageops::{self, FilterType};

use super::decode::decode_image_src;
use super::font;
use super::surface::{Frame, MAX_SURFACE_PIXELS, color_or};
use crate::badge::model::{
    BadgeAlign, BadgeContent, BadgeShape, BadgeVerticalAlign, Crop, CustomBadge,
    DEFAULT_BACKGROUND_COLOR, DEFAULT_BORDER_COLOR, DEFAULT_TEXT_COLOR, ImageSettings,
};
use crate::sheet::{CSS_DPI, mm_to_px};

/// Top-left corner of a `badge_w x badge_h` box anchored in a host area.
pub fn badge_origin(
    align: BadgeAlign,
    vertical_align: BadgeVerticalAlign,
    host: (i64, i64),
    badge: (i64, i64),
) -> (i64, i64) {
    let (host_w, host_h) = host;
    let (badge_w, badge_h) = badge;
    let x = match align {
        BadgeAlign::Left => 0,
        BadgeAlign::Center => host_w.saturating_sub(badge_w) / 2,
        BadgeAlign::Right => host_w.saturating_sub(badge_w),
    };
    let y = match vertical_align {
        BadgeVerticalAlign::Top => 0,
        BadgeVerticalAlign::Middle => host_h.saturating_sub(badge_h) / 2,
        BadgeVerticalAlign::Bottom => host_h.saturating_sub(badge_h),
    };
    (x, y)
}

/// Whether the pixel at `(px, py)` lies inside a `w x h` shape.
///
/// Tests the pixel center. Circles are ellipses inscribed in the box;
/// rectangles use `radius` corners (clamped to half the short side).
pub fn shape_contains(shape: BadgeShape, w: i64, h: i64, radius: i64, px: i64, py: i64) -> bool {
    if w <= 0 || h <= 0 || px < 0 || py < 0 || px >= w || py >= h {
        return false;
    }
    let cx = px as f64 + 0.5;
    let cy = py as f64 + 0.5;
    match shape {
        BadgeShape::Circle => {
            let rx = w as f64 / 2.0;
            let ry = h as f64 / 2.0;
            let dx = (cx - rx) / rx;
            let dy = (cy - ry) / ry;
            dx * dx + dy * dy <= 1.0
        }
        BadgeShape::Rectangle => {
            let r = (radius.max(0) as f64).min(w.min(h) as f64 / 2.0);
            if r <= 0.0 {
                return true;
            }
            // Distance from the nearest corner circle's center, per axis
            let nx = if cx < r {
                r - cx
            } else if cx > w as f64 - r {
                cx - (w as f64 - r)
            } else {
                0.0
            };
            let ny = if cy < r {
                r - cy
            } else if cy > h as f64 - r {
                cy - (h as f64 - r)
            } else {
                0.0
            };
            nx * nx + ny * ny <= r * r
        }
    }
}

/// Badge geometry in pixels at a given resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeBox {
    pub width: i64,
    pub height: i64,
    pub radius: i64,
    /// Border thickness, 0 when the border is disabled.
    pub border: i64,
}

impl BadgeBox {
    pub fn for_badge(badge: &CustomBadge, dpi: u32) -> Self {
        Self {
            width: mm_to_px(badge.width, dpi),
            height: mm_to_px(badge.height, dpi),
            radius: mm_to_px(badge.border_radius, dpi),
            border: if badge.border_enabled {
                mm_to_px(badge.border_width, dpi).max(1)
            } else {
                0
            },
        }
    }

    fn contains(&self, shape: BadgeShape, px: i64, py: i64) -> bool {
        shape_contains(shape, self.width, self.height, self.radius, px, py)
    }

    fn inner_contains(&self, shape: BadgeShape, px: i64, py: i64) -> bool {
        let b = self.border;
        shape_contains(
            shape,
            self.width.saturating_sub(b.saturating_mul(2)),
            self.height.saturating_sub(b.saturating_mul(2)),
            self.radius.saturating_sub(b),
            px.saturating_sub(b),
            py.saturating_sub(b),
        )
    }
}

/// Draw `badge` anchored inside a `host_width x host_height` area whose
/// top-left corner is the frame origin.
pub fn draw_badge(
    frame: &mut Frame<'_>,
    badge: &CustomBadge,
    host_width: i64,
    host_height: i64,
    dpi: u32,
) {
    let geometry = BadgeBox::for_badge(badge, dpi);
    if geometry.width <= 0 || geometry.height <= 0 {
        return;
    }
    let (x, y) = badge_origin(
        badge.badge_align,
        badge.badge_vertical_align,
        (host_width, host_height),
        (geometry.width, geometry.height),
    );
    let mut local = frame.translate(x, y);
    let shape = badge.shape;

    match badge.content() {
        Some(BadgeContent::Text {
            text,
            background_color,
            text_color,
            font_size,
        }) => {
            let background = color_or(background_color, DEFAULT_BACKGROUND_COLOR);
            local.fill_mask(0, 0, geometry.width, geometry.height, background, |px, py| {
                geometry.contains(shape, px, py)
            });

            let inner_w = geometry.width.saturating_sub(geometry.border.saturating_mul(2));
            let wanted = (font_size * dpi as f64 / CSS_DPI as f64).round() as i64;
            let height = font::fit_height(text, inner_w, wanted.min(geometry.height));
            let tx = (geometry.width - font::text_width(text, height)) / 2;
            let ty = (geometry.height - height) / 2;
            let ink = color_or(text_color, DEFAULT_TEXT_COLOR);
            font::draw_text(&mut local, tx, ty, text, height, ink);
        }
        Some(BadgeContent::Image(settings)) => match badge_raster(settings, &geometry) {
            Some(raster) => local.draw_image_masked(0, 0, &raster, |px, py| {
                geometry.contains(shape, px, py)
            }),
            None => {
                tracing::warn!(badge = %badge.id, "badge image could not be rasterized, skipping");
            }
        },
        None => {
            tracing::warn!(badge = %badge.id, "image badge without image settings");
        }
    }

    if geometry.border > 0 {
        let border_color = color_or(&badge.border_color, DEFAULT_BORDER_COLOR);
        local.fill_mask(0, 0, geometry.width, geometry.height, border_color, |px, py| {
            geometry.contains(shape, px, py) && !geometry.inner_contains(shape, px, py)
        });
    }
}

/// Decode, crop and resize an image badge to its pixel box.
///
/// `None` when the image does not decode or the box is larger than a surface.
fn badge_raster(settings: &ImageSettings, geometry: &BadgeBox) -> Option<image::RgbaImage> {
    let width = u32::try_from(geometry.width).ok()?;
    let height = u32::try_from(geometry.height).ok()?;
    if u64::from(width) * u64::from(height) > MAX_SURFACE_PIXELS {
        tracing::debug!(width, height, "badge image box too large");
        return None;
    }
    let decoded = decode_image_src(&settings.src)
        .map_err(|e| tracing::debug!(error = %e, "badge image decode failed"))
        .ok()?
        .to_rgba8();

    let cropped = match &settings.crop {
        Some(crop) => {
            let (x, y, w, h) = crop_rect(crop, decoded.width(), decoded.height());
            imageops::crop_imm(&decoded, x, y, w, h).to_image()
        }
        None => decoded,
    };

    Some(imageops::resize(&cropped, width, height, FilterType::Triangle))
}

/// Convert fractional crop to a pixel rectangle inside a `width x height` image.
///
/// Each axis is independent; the result is at least 1x1.
pub fn crop_rect(crop: &Crop, width: u32, height: u32) -> (u32, u32, u32, u32) {
    fn axis(offset: f64, size: f64, total: u32) -> (u32, u32) {
        let total_f = total as f64;
        let start = (offset.clamp(0.0, 1.0) * total_f).round() as u32;
        let start = start.min(total.saturating_sub(1));
        let len = (size.clamp(0.0, 1.0) * total_f).round() as u32;
        let len = len.clamp(1, total.saturating_sub(start).max(1));
        (start, len)
    }
    let (x, w) = axis(crop.x, crop.width, width);
    let (y, h) = axis(crop.y, crop.height, height);
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::model::CustomBadgeInput;
    use crate::render::decode::tests::png_data_url;
    use crate::render::surface::{Surface, WHITE};
    use chrono::Utc;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn badge(input: CustomBadgeInput) -> CustomBadge {
        let now = Utc::now();
        input.into_badge("b".into(), now, now)
    }

    #[test]
    fn test_badge_origin_anchors() {
        let host = (100, 60);
        let b = (20, 10);
        assert_eq!(badge_origin(BadgeAlign::Left, BadgeVerticalAlign::Top, host, b), (0, 0));
        assert_eq!(badge_origin(BadgeAlign::Center, BadgeVerticalAlign::Middle, host, b), (40, 25));
        assert_eq!(badge_origin(BadgeAlign::Right, BadgeVerticalAlign::Bottom, host, b), (80, 50));
    }

    #[test]
    fn test_circle_contains() {
        assert!(shape_contains(BadgeShape::Circle, 10, 10, 0, 5, 5));
        assert!(!shape_contains(BadgeShape::Circle, 10, 10, 0, 0, 0));
        assert!(!shape_contains(BadgeShape::Circle, 10, 10, 0, 10, 5));
    }

    #[test]
    fn test_rounded_rect_contains() {
        // Square corners without radius
        assert!(shape_contains(BadgeShape::Rectangle, 10, 10, 0, 0, 0));
        // Corner cut off with radius, edges kept
        assert!(!shape_contains(BadgeShape::Rectangle, 10, 10, 4, 0, 0));
        assert!(shape_contains(BadgeShape::Rectangle, 10, 10, 4, 0, 5));
        assert!(shape_contains(BadgeShape::Rectangle, 10, 10, 4, 5, 0));
    }

    #[test]
    fn test_badge_box_at_dpi() {
        let b = badge(CustomBadgeInput {
            width: Some(25.4),
            height: Some(12.7),
            border_enabled: Some(false),
            ..CustomBadgeInput::text("S", "S")
        });
        let geometry = BadgeBox::for_badge(&b, 300);
        assert_eq!((geometry.width, geometry.height, geometry.border), (300, 150, 0));
    }

    #[test]
    fn test_text_badge_fills_shape() {
        // 25.4mm square at 10 DPI = 10px, right/top in a 40x40 host
        let b = badge(CustomBadgeInput {
            shape: Some(BadgeShape::Rectangle),
            width: Some(25.4),
            height: Some(25.4),
            border_radius: Some(0.1),
            background_color: Some("#ff0000".into()),
            border_enabled: Some(false),
            ..CustomBadgeInput::text("S", " ")
        });
        let mut surface = Surface::acquire(40, 40).unwrap();
        draw_badge(&mut surface.frame_at(0, 0), &b, 40, 40, 10);
        assert_eq!(surface.pixel(35, 5), Some(RED));
        assert_eq!(surface.pixel(29, 5), Some(WHITE));
        assert_eq!(surface.pixel(35, 11), Some(WHITE));
    }

    #[test]
    fn test_border_drawn_inside_shape() {
        let b = badge(CustomBadgeInput {
            shape: Some(BadgeShape::Rectangle),
            width: Some(25.4),
            height: Some(25.4),
            background_color: Some("#ff0000".into()),
            border_color: Some("#0000ff".into()),
            border_width: Some(2.54),
            badge_align: Some(BadgeAlign::Left),
            ..CustomBadgeInput::text("S", " ")
        });
        // 100 DPI: box 100px, border 10px, radius 2mm ≈ 8px
        let mut surface = Surface::acquire(100, 100).unwrap();
        draw_badge(&mut surface.frame_at(0, 0), &b, 100, 100, 100);
        assert_eq!(surface.pixel(50, 2), Some(BLUE));
        assert_eq!(surface.pixel(50, 50), Some(RED));
        assert_eq!(surface.pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn test_image_badge_draws_decoded_pixels() {
        let settings = ImageSettings {
            src: png_data_url(4, 4, GREEN),
            file_name: None,
            original_width: 4,
            original_height: 4,
            crop: None,
        };
        let b = badge(CustomBadgeInput {
            shape: Some(BadgeShape::Rectangle),
            width: Some(25.4),
            height: Some(25.4),
            border_radius: Some(0.1),
            border_enabled: Some(false),
            badge_align: Some(BadgeAlign::Left),
            ..CustomBadgeInput::image("Logo", settings)
        });
        let mut surface = Surface::acquire(20, 20).unwrap();
        draw_badge(&mut surface.frame_at(0, 0), &b, 20, 20, 10);
        assert_eq!(surface.pixel(5, 5), Some(GREEN));
        assert_eq!(surface.pixel(15, 15), Some(WHITE));
    }

    #[test]
    fn test_undecodable_image_badge_is_skipped() {
        let settings = ImageSettings {
            src: "data:image/png;base64,AAAA".into(),
            file_name: None,
            original_width: 1,
            original_height: 1,
            crop: None,
        };
        let b = badge(CustomBadgeInput {
            border_enabled: Some(false),
            ..CustomBadgeInput::image("Logo", settings)
        });
        let mut surface = Surface::acquire(20, 20).unwrap();
        draw_badge(&mut surface.frame_at(0, 0), &b, 20, 20, 10);
        assert!(surface.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_oversized_image_badge_is_not_resized() {
        let settings = ImageSettings {
            src: png_data_url(2, 2, GREEN),
            file_name: None,
            original_width: 2,
            original_height: 2,
            crop: None,
        };
        let mut b = badge(CustomBadgeInput {
            border_enabled: Some(false),
            ..CustomBadgeInput::image("Logo", settings)
        });
        b.width = 5000.0;
        b.height = 5000.0;
        let mut surface = Surface::acquire(20, 20).unwrap();
        draw_badge(&mut surface.frame_at(0, 0), &b, 20, 20, 300);
        assert!(surface.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_huge_border_does_not_overflow() {
        let geometry = BadgeBox {
            width: 10,
            height: 10,
            radius: 0,
            border: i64::MAX,
        };
        assert!(!geometry.inner_contains(BadgeShape::Rectangle, 5, 5));
        assert!(geometry.contains(BadgeShape::Rectangle, 5, 5));
        assert_eq!(
            badge_origin(BadgeAlign::Right, BadgeVerticalAlign::Bottom, (-10, -10), (i64::MAX, 1)),
            (i64::MIN, -11)
        );
    }

    #[test]
    fn test_crop_rect_axes_are_independent() {
        let crop = Crop {
            x: 0.5,
            y: 0.0,
            width: 0.5,
            height: 0.25,
        };
        assert_eq!(crop_rect(&crop, 200, 100), (100, 0, 100, 25));
    }

    #[test]
    fn test_crop_rect_never_empty() {
        let crop = Crop {
            x: 1.0,
            y: 1.0,
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(crop_rect(&crop, 10, 10), (9, 9, 1, 1));
    }
}
