//! The per-pop compositor boundary.
//!
//! The rasterizer knows nothing about what a pop looks like. For each
//! placement it hands a [`PopCompositor`] a frame whose origin is the pop's
//! top-left pixel, the pop's content, and its pixel size. The compositor
//! owns everything drawn in that frame.
//!
//! [`CardCompositor`] is the built-in compositor: a simple card (outline,
//! text lines or a fitted image) with badges layered on top.

use image::imageops::{self, FilterType};

use super::RenderError;
use super::badge::draw_badge;
use super::decode::decode_image_src;
use super::font;
use super::surface::{BLACK, Frame, MAX_SURFACE_PIXELS, color_or, parse_color};
use crate::badge::{CustomBadge, validate::validate_badge};
use crate::sheet::{BadgeSlot, ImagePop, PopContent, TextPop, mm_to_px};

/// Draws a single pop into a frame translated to the pop's origin.
pub trait PopCompositor {
    /// Draw `pop` into the `width x height` pixel box at the frame origin.
    ///
    /// Must not assume anything about sibling pops or earlier frame state.
    fn draw_pop(
        &mut self,
        frame: &mut Frame<'_>,
        pop: &PopContent,
        width: i64,
        height: i64,
    ) -> Result<(), RenderError>;
}

impl<C: PopCompositor + ?Sized> PopCompositor for &mut C {
    fn draw_pop(
        &mut self,
        frame: &mut Frame<'_>,
        pop: &PopContent,
        width: i64,
        height: i64,
    ) -> Result<(), RenderError> {
        (**self).draw_pop(frame, pop, width, height)
    }
}

/// Compositor backed by a closure. Build with [`from_fn`].
pub struct FnCompositor<F>(F);

/// Wrap a closure as a [`PopCompositor`].
pub fn from_fn<F>(f: F) -> FnCompositor<F>
where
    F: FnMut(&mut Frame<'_>, &PopContent, i64, i64) -> Result<(), RenderError>,
{
    FnCompositor(f)
}

impl<F> PopCompositor for FnCompositor<F>
where
    F: FnMut(&mut Frame<'_>, &PopContent, i64, i64) -> Result<(), RenderError>,
{
    fn draw_pop(
        &mut self,
        frame: &mut Frame<'_>,
        pop: &PopContent,
        width: i64,
        height: i64,
    ) -> Result<(), RenderError> {
        (self.0)(frame, pop, width, height)
    }
}

/// Inner padding of a card.
const CARD_PADDING_MM: f64 = 2.0;
/// Outline thickness of a card.
const CARD_OUTLINE_MM: f64 = 0.3;

/// Built-in card compositor.
///
/// Badge references are resolved against the snapshot given to
/// [`with_badges`](Self::with_badges), typically `BadgeStore::get_all()`.
#[derive(Debug, Clone)]
pub struct CardCompositor {
    dpi: u32,
    badges: Vec<CustomBadge>,
}

impl CardCompositor {
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi,
            badges: Vec::new(),
        }
    }

    pub fn with_badges(mut self, badges: Vec<CustomBadge>) -> Self {
        self.badges = badges;
        self
    }

    /// The badge a slot points at, if it exists and is within badge bounds.
    fn resolve<'a>(&'a self, slot: &'a BadgeSlot) -> Option<&'a CustomBadge> {
        let badge = match slot {
            BadgeSlot::Inline(badge) => &**badge,
            BadgeSlot::Ref { badge_id } => {
                let Some(found) = self.badges.iter().find(|b| &b.id == badge_id) else {
                    tracing::warn!(badge_id = %badge_id, "pop references unknown badge");
                    return None;
                };
                found
            }
        };
        // Inline badges come straight from page JSON and skip the store's checks
        if let Err(e) = validate_badge(badge) {
            tracing::warn!(badge = %badge.id, error = %e, "invalid badge, skipping");
            return None;
        }
        Some(badge)
    }

    fn draw_text_card(&self, frame: &mut Frame<'_>, card: &TextPop, width: i64, height: i64) {
        if let Some(bg) = card.background_color.as_deref().and_then(parse_color) {
            frame.fill_rect(0, 0, width, height, bg);
        }
        let ink = card
            .text_color
            .as_deref()
            .map(|c| color_or(c, "#000000"))
            .unwrap_or(BLACK);
        let outline = mm_to_px(CARD_OUTLINE_MM, self.dpi).max(1);
        frame.stroke_rect(0, 0, width, height, outline, ink);

        if card.lines.is_empty() {
            return;
        }
        let pad = mm_to_px(CARD_PADDING_MM, self.dpi);
        let inner_w = width.saturating_sub(pad.saturating_mul(2));
        let inner_h = height.saturating_sub(pad.saturating_mul(2));
        let slot_h = inner_h / card.lines.len() as i64;
        if inner_w <= 0 || slot_h <= 0 {
            return;
        }

        for (i, line) in card.lines.iter().enumerate() {
            let glyph_h = font::fit_height(line, inner_w, slot_h);
            let x = pad.saturating_add((inner_w - font::text_width(line, glyph_h)) / 2);
            let y = pad
                .saturating_add((i as i64).saturating_mul(slot_h))
                .saturating_add((slot_h - glyph_h) / 2);
            font::draw_text(frame, x, y, line, glyph_h, ink);
        }
    }

    fn draw_image_card(&self, frame: &mut Frame<'_>, card: &ImagePop, width: i64, height: i64) {
        let decoded = match decode_image_src(&card.src) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                tracing::warn!(error = %e, "pop image could not be decoded");
                let outline = mm_to_px(CARD_OUTLINE_MM, self.dpi).max(1);
                frame.stroke_rect(0, 0, width, height, outline, BLACK);
                return;
            }
        };
        if width <= 0 || height <= 0 || decoded.width() == 0 || decoded.height() == 0 {
            return;
        }

        // Contain: scale to fit, preserve aspect, center
        let scale = (width as f64 / decoded.width() as f64)
            .min(height as f64 / decoded.height() as f64);
        let fit_w = (decoded.width() as f64 * scale).round().max(1.0);
        let fit_h = (decoded.height() as f64 * scale).round().max(1.0);
        if fit_w * fit_h > MAX_SURFACE_PIXELS as f64 {
            tracing::warn!(fit_w, fit_h, "pop image too large to scale, skipping");
            return;
        }
        let (fit_w, fit_h) = (fit_w as i64, fit_h as i64);
        let x = (width - fit_w) / 2;
        let y = (height - fit_h) / 2;
        if !frame.is_visible(x, y, fit_w, fit_h) {
            return;
        }
        let fitted = imageops::resize(&decoded, fit_w as u32, fit_h as u32, FilterType::Triangle);
        frame.draw_image(x, y, &fitted);
    }
}

impl PopCompositor for CardCompositor {
    fn draw_pop(
        &mut self,
        frame: &mut Frame<'_>,
        pop: &PopContent,
        width: i64,
        height: i64,
    ) -> Result<(), RenderError> {
        match pop {
            PopContent::Text(card) => self.draw_text_card(frame, card, width, height),
            PopContent::Image(card) => self.draw_image_card(frame, card, width, height),
        }

        for slot in pop.badges() {
            if let Some(badge) = self.resolve(slot) {
                draw_badge(frame, badge, width, height, self.dpi);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::{BadgeAlign, BadgeShape, BadgeVerticalAlign, CustomBadgeInput};
    use crate::render::decode::tests::png_data_url;
    use crate::render::surface::{Surface, WHITE};
    use chrono::Utc;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn red_square(id: &str) -> CustomBadge {
        let now = Utc::now();
        CustomBadgeInput {
            shape: Some(BadgeShape::Rectangle),
            width: Some(25.4),
            height: Some(25.4),
            border_radius: Some(0.01),
            background_color: Some("#ff0000".into()),
            text_color: Some("#ff0000".into()),
            border_enabled: Some(false),
            badge_align: Some(BadgeAlign::Left),
            badge_vertical_align: Some(BadgeVerticalAlign::Top),
            ..CustomBadgeInput::text("Red", "SALE")
        }
        .into_badge(id.into(), now, now)
    }

    #[test]
    fn test_text_card_draws_outline_and_text() {
        let mut surface = Surface::acquire(200, 100).unwrap();
        let pop = PopContent::Text(TextPop::new(["PRICE", "9.99"]));
        CardCompositor::new(100)
            .draw_pop(&mut surface.frame_at(0, 0), &pop, 200, 100)
            .unwrap();
        assert_eq!(surface.pixel(0, 50), Some(BLACK));
        assert_eq!(surface.pixel(199, 50), Some(BLACK));
        let inked = surface
            .as_image()
            .enumerate_pixels()
            .filter(|(x, y, p)| *x > 10 && *x < 190 && *y > 10 && *y < 90 && **p == BLACK)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_text_card_background() {
        let mut surface = Surface::acquire(50, 50).unwrap();
        let pop = PopContent::Text(TextPop {
            background_color: Some("#ff0000".into()),
            ..TextPop::new(Vec::<String>::new())
        });
        CardCompositor::new(100)
            .draw_pop(&mut surface.frame_at(0, 0), &pop, 50, 50)
            .unwrap();
        assert_eq!(surface.pixel(25, 25), Some(RED));
    }

    #[test]
    fn test_resolves_badge_references() {
        let mut surface = Surface::acquire(40, 40).unwrap();
        let pop = PopContent::Text(TextPop {
            badges: vec![
                BadgeSlot::Ref {
                    badge_id: "known".into(),
                },
                BadgeSlot::Ref {
                    badge_id: "missing".into(),
                },
            ],
            ..TextPop::new(Vec::<String>::new())
        });
        CardCompositor::new(10)
            .with_badges(vec![red_square("known")])
            .draw_pop(&mut surface.frame_at(0, 0), &pop, 40, 40)
            .unwrap();
        // 25.4mm at 10 DPI = 10px badge at the top-left
        assert_eq!(surface.pixel(5, 5), Some(RED));
        assert_eq!(surface.pixel(20, 20), Some(WHITE));
    }

    #[test]
    fn test_inline_badge() {
        let mut surface = Surface::acquire(40, 40).unwrap();
        let pop = PopContent::Text(TextPop {
            badges: vec![BadgeSlot::Inline(Box::new(red_square("inline")))],
            ..TextPop::new(Vec::<String>::new())
        });
        CardCompositor::new(10)
            .draw_pop(&mut surface.frame_at(0, 0), &pop, 40, 40)
            .unwrap();
        assert_eq!(surface.pixel(5, 5), Some(RED));
    }

    #[test]
    fn test_out_of_bounds_inline_badge_is_skipped() {
        let mut oversized = red_square("inline");
        oversized.width = 1e300;
        let mut blank = red_square("blank");
        blank.text = "   ".into();
        let pop = PopContent::Text(TextPop {
            badges: vec![
                BadgeSlot::Inline(Box::new(oversized)),
                BadgeSlot::Inline(Box::new(blank)),
            ],
            ..TextPop::new(Vec::<String>::new())
        });
        let mut surface = Surface::acquire(40, 40).unwrap();
        CardCompositor::new(10)
            .draw_pop(&mut surface.frame_at(0, 0), &pop, 40, 40)
            .unwrap();
        assert_eq!(surface.pixel(5, 5), Some(WHITE));
        assert_eq!(surface.pixel(20, 20), Some(WHITE));
    }

    #[test]
    fn test_huge_image_card_is_skipped() {
        let mut surface = Surface::acquire(20, 20).unwrap();
        let pop = PopContent::Image(ImagePop {
            src: png_data_url(2, 2, RED),
            badges: Vec::new(),
        });
        CardCompositor::new(10)
            .draw_pop(&mut surface.frame_at(0, 0), &pop, i64::MAX, i64::MAX)
            .unwrap();
        // Scaling a 2x2 image to the card would need far more than a surface's worth of pixels
        assert_eq!(surface.pixel(10, 10), Some(WHITE));
    }

    #[test]
    fn test_offscreen_image_card_is_not_scaled() {
        let mut surface = Surface::acquire(20, 20).unwrap();
        let pop = PopContent::Image(ImagePop {
            src: png_data_url(2, 2, RED),
            badges: Vec::new(),
        });
        CardCompositor::new(10)
            .draw_pop(&mut surface.frame_at(100, 100), &pop, 20, 20)
            .unwrap();
        assert!(surface.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_image_card_is_contained_and_centered() {
        let mut surface = Surface::acquire(40, 20).unwrap();
        let pop = PopContent::Image(ImagePop {
            src: png_data_url(2, 2, RED),
            badges: Vec::new(),
        });
        CardCompositor::new(10)
            .draw_pop(&mut surface.frame_at(0, 0), &pop, 40, 20)
            .unwrap();
        // 2x2 scaled to 20x20, centered at x = 10..30
        assert_eq!(surface.pixel(20, 10), Some(RED));
        assert_eq!(surface.pixel(5, 10), Some(WHITE));
        assert_eq!(surface.pixel(35, 10), Some(WHITE));
    }

    #[test]
    fn test_from_fn_compositor() {
        let mut calls = Vec::new();
        let mut compositor = from_fn(|frame: &mut Frame<'_>, _pop: &PopContent, w: i64, h: i64| {
            calls.push((frame.origin(), w, h));
            Ok(())
        });
        let mut surface = Surface::acquire(10, 10).unwrap();
        let pop = PopContent::Text(TextPop::default());
        compositor
            .draw_pop(&mut surface.frame_at(2, 3), &pop, 4, 5)
            .unwrap();
        drop(compositor);
        assert_eq!(calls, vec![((2, 3), 4, 5)]);
    }
}
