//! # Popsheet - Printable Pop Sheet Library
//!
//! Popsheet lays out "pops" (price tags, shelf cards, record-bin dividers) on
//! a physical page and rasterizes the page at print resolution. It provides:
//!
//! - **Page model**: pages in millimeters with positioned pop placements
//! - **Rasterizer**: page to RGBA surface at any DPI, PNG output, live preview
//! - **Badges**: a small persisted catalog of reusable text/image overlays
//! - **Discogs links**: classification of Discogs release/master/artist/label URLs
//!
//! ## Quick Start
//!
//! ```
//! use popsheet::{
//!     badge::{BadgeStore, CustomBadgeInput, MemoryStorage},
//!     render::{CardCompositor, render_page},
//!     sheet::{
//!         BadgeSlot, PageDescriptor, PaperSize, PopContent, PopPlacement, RenderSettings, TextPop,
//!     },
//! };
//!
//! let store = BadgeStore::new(MemoryStorage::new());
//! let sale = store.create(CustomBadgeInput::text("Sale", "SALE"))?;
//!
//! let card = TextPop {
//!     badges: vec![BadgeSlot::Ref { badge_id: sale.id.clone() }],
//!     ..TextPop::new(["Kind of Blue", "19.99"])
//! };
//! let page = PageDescriptor::new(PaperSize::A4)
//!     .with_pop(PopPlacement::new(10.0, 10.0, 90.0, 60.0, PopContent::Text(card)));
//!
//! let settings = RenderSettings::with_dpi(150);
//! let mut compositor = CardCompositor::new(settings.dpi).with_badges(store.get_all());
//! let rendered = render_page(&page, &settings, &mut compositor)?;
//! assert_eq!(rendered.image.dimensions(), (1240, 1754));
//!
//! # Ok::<(), popsheet::PopsheetError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`sheet`] | Unit conversion, paper sizes, page descriptors |
//! | [`render`] | Rasterizer, compositor boundary, badge drawing |
//! | [`badge`] | Badge model, validation, storage, catalog store |
//! | [`discogs`] | Discogs URL classification |
//! | [`error`] | Error types |

pub mod badge;
pub mod discogs;
pub mod error;
pub mod render;
pub mod sheet;

// Re-exports for convenience
pub use badge::{BadgeStore, CustomBadge, CustomBadgeInput};
pub use error::PopsheetError;
pub use render::{CardCompositor, RenderedPage, render_page};
pub use sheet::{PageDescriptor, PaperSize, RenderSettings};
