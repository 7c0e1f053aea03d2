//! # Sheet Module
//!
//! Physical page description and millimeter ↔ pixel conversion.
//!
//! ## Modules
//!
//! - [`config`]: unit conversion, paper presets, render settings
//! - [`types`]: page and pop descriptors

pub mod config;
pub mod types;

pub use config::{
    CSS_DPI, DEFAULT_DPI, MM_PER_INCH, PaperSize, RenderSettings, mm_to_px, px_to_mm,
};
pub use types::{
    BadgeSlot, Dimensions, ImagePop, PageDescriptor, PopContent, PopPlacement, TextPop,
};
