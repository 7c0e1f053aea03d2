//! # Rendering Module
//!
//! Turns a [`PageDescriptor`](crate::sheet::PageDescriptor) into pixels.
//!
//! ## Modules
//!
//! - [`rasterizer`]: page surface, per-pop frames, PNG output, live preview
//! - [`compositor`]: the per-pop drawing boundary and the built-in card compositor
//! - [`badge`]: badge anchoring, shapes and drawing
//! - [`surface`]: pixel buffer, translated frames, color parsing
//! - [`font`]: bitmap text
//! - [`decode`]: embedded image data
//!
//! ## Usage Example
//!
//! ```
//! use popsheet::render::{CardCompositor, render_page};
//! use popsheet::sheet::{
//!     PageDescriptor, PaperSize, PopContent, PopPlacement, RenderSettings, TextPop,
//! };
//!
//! let page = PageDescriptor::new(PaperSize::A5).with_pop(PopPlacement::new(
//!     10.0, 10.0, 60.0, 40.0,
//!     PopContent::Text(TextPop::new(["Blue Train", "24.99"])),
//! ));
//! let settings = RenderSettings::with_dpi(96);
//! let rendered = render_page(&page, &settings, &mut CardCompositor::new(96)).unwrap();
//! assert_eq!(rendered.image.dimensions(), (559, 794));
//! ```

use thiserror::Error;

pub mod badge;
pub mod compositor;
pub mod decode;
pub mod font;
pub mod rasterizer;
pub mod surface;

pub use compositor::{CardCompositor, FnCompositor, PopCompositor, from_fn};
pub use rasterizer::{DisplaySize, PagePreview, RenderedPage, render_page};
pub use surface::{Frame, MAX_SURFACE_PIXELS, Surface, parse_color};

/// Errors produced while rendering a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface could not be allocated at this size.
    #[error("drawing surface unavailable for {width}x{height} pixels")]
    SurfaceUnavailable { width: i64, height: i64 },

    /// A pop compositor failed.
    #[error("compositor error: {0}")]
    Compositor(String),

    /// PNG encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Embedded image data could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}
