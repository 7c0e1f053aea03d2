//! Page rasterization.
//!
//! [`render_page`] allocates a white surface sized from the page's physical
//! dimensions, then hands each pop, in declaration order, to a
//! [`PopCompositor`] inside a frame translated to the pop's pixel origin.
//! Each pop gets a fresh frame, so no translation state carries over between
//! pops.
//!
//! Geometry goes through [`mm_to_px`] one value at a time. A pop's right edge
//! is `mm_to_px(x) + mm_to_px(width)`, which may differ by a pixel from
//! `mm_to_px(x + width)`.

use std::path::Path;

use image::{ImageEncoder, ImageFormat, RgbaImage};

use super::RenderError;
use super::compositor::PopCompositor;
use super::surface::Surface;
use crate::sheet::{CSS_DPI, PageDescriptor, RenderSettings, mm_to_px};

/// Presentation size of a rendered page in CSS pixels.
///
/// Derived from the pixel size and DPI, then multiplied by the display
/// scale. Never affects pixel content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn from_pixels(width: u32, height: u32, dpi: u32, scale: f64) -> Self {
        if dpi == 0 {
            return Self {
                width: 0.0,
                height: 0.0,
            };
        }
        let factor = CSS_DPI as f64 / dpi as f64 * scale;
        Self {
            width: width as f64 * factor,
            height: height as f64 * factor,
        }
    }
}

/// A fully drawn page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub image: RgbaImage,
    pub dpi: u32,
    pub display: DisplaySize,
}

impl RenderedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e: image::ImageError| RenderError::Encode(e.to_string()))?;
        Ok(png_bytes)
    }

    /// Write the page to `path` as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(format!("{}: {}", path.display(), e)))
    }
}

/// Rasterize `page` at `settings.dpi`.
///
/// Fails with [`RenderError::SurfaceUnavailable`] before anything is drawn
/// when the page size does not yield a usable surface. A compositor error
/// aborts the render; the partly drawn surface is dropped.
pub fn render_page<C>(
    page: &PageDescriptor,
    settings: &RenderSettings,
    compositor: &mut C,
) -> Result<RenderedPage, RenderError>
where
    C: PopCompositor + ?Sized,
{
    let dpi = settings.dpi;
    let width = mm_to_px(page.dimensions.width_mm, dpi);
    let height = mm_to_px(page.dimensions.height_mm, dpi);
    let mut surface = Surface::acquire(width, height)?;

    tracing::debug!(width, height, dpi, pops = page.pops.len(), "rendering page");

    for (index, placement) in page.pops.iter().enumerate() {
        let (x, w) = clamp_span(
            mm_to_px(placement.x, dpi),
            mm_to_px(placement.width, dpi),
            width,
        );
        let (y, h) = clamp_span(
            mm_to_px(placement.y, dpi),
            mm_to_px(placement.height, dpi),
            height,
        );

        let mut frame = surface.frame_at(x, y);
        compositor
            .draw_pop(&mut frame, &placement.pop, w, h)
            .inspect_err(|e| tracing::warn!(index, error = %e, "pop failed, render aborted"))?;
    }

    let image = surface.into_image();
    let display = DisplaySize::from_pixels(image.width(), image.height(), dpi, settings.scale);
    Ok(RenderedPage {
        image,
        dpi,
        display,
    })
}

/// Clamp a pop's pixel span on one axis to `[-limit, 2 * limit]`.
///
/// Everything outside that band is off the surface anyway, so only pops
/// reaching more than a page length past an edge change size. Negative
/// lengths stay non-positive.
fn clamp_span(start: i64, len: i64, limit: i64) -> (i64, i64) {
    let (lo, hi) = (-limit, limit.saturating_mul(2));
    let end = start.saturating_add(len).clamp(lo, hi);
    let start = start.clamp(lo, hi);
    (start, end - start)
}

/// Keeps a rendered page in sync with its inputs.
///
/// Any change to the page, DPI or scale triggers a full redraw from a blank
/// surface. There is no partial repaint. Changes the preview cannot see (for
/// example an edited badge catalog behind the compositor) need
/// [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct PagePreview {
    inputs: Option<(PageDescriptor, RenderSettings)>,
    rendered: Option<RenderedPage>,
}

impl PagePreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw if `page` or `settings` differ from the last successful render.
    ///
    /// Returns whether a redraw happened. On error the held page is cleared,
    /// so a stale image is never shown for new inputs.
    pub fn update<C>(
        &mut self,
        page: &PageDescriptor,
        settings: &RenderSettings,
        compositor: &mut C,
    ) -> Result<bool, RenderError>
    where
        C: PopCompositor + ?Sized,
    {
        let unchanged = self
            .inputs
            .as_ref()
            .is_some_and(|(p, s)| p == page && s == settings);
        if unchanged && self.rendered.is_some() {
            return Ok(false);
        }

        self.inputs = None;
        self.rendered = None;
        let rendered = render_page(page, settings, compositor)?;
        self.inputs = Some((page.clone(), *settings));
        self.rendered = Some(rendered);
        Ok(true)
    }

    /// Force the next [`update`](Self::update) to redraw.
    pub fn invalidate(&mut self) {
        self.inputs = None;
    }

    pub fn current(&self) -> Option<&RenderedPage> {
        self.rendered.as_ref()
    }
}
