//! # Sheet Configuration
//!
//! Physical units, paper presets and render settings.
//!
//! ## Unit Conversion
//!
//! ```text
//! pixels_per_mm = dpi / 25.4
//! pixels        = round(mm * dpi / 25.4)
//!
//! For A4 at 300 DPI:
//!   210mm → 2480 px
//!   297mm → 3508 px
//! ```
//!
//! Every call rounds independently, so `mm_to_px(a + b)` is not guaranteed
//! to equal `mm_to_px(a) + mm_to_px(b)`. Pop placements may therefore drift
//! by a pixel relative to each other; this is accepted.
//!
//! ## Usage
//!
//! ```
//! use popsheet::sheet::{PaperSize, mm_to_px};
//!
//! let a4 = PaperSize::A4;
//! assert_eq!(mm_to_px(a4.width_mm, 300), 2480);
//! assert_eq!(mm_to_px(a4.height_mm, 300), 3508);
//! ```

use serde::{Deserialize, Serialize};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Default rasterization resolution.
pub const DEFAULT_DPI: u32 = 300;

/// CSS reference resolution used for display sizing and `px` font sizes.
pub const CSS_DPI: u32 = 96;

/// Convert millimeters to whole pixels at the given resolution.
///
/// Rounds half up (`floor(x + 0.5)`), so `-0.5` maps to `0` the same way
/// `0.5` maps to `1`.
#[inline]
pub fn mm_to_px(mm: f64, dpi: u32) -> i64 {
    (mm * dpi as f64 / MM_PER_INCH + 0.5).floor() as i64
}

/// Convert pixels back to millimeters (no rounding).
#[inline]
pub fn px_to_mm(px: i64, dpi: u32) -> f64 {
    if dpi == 0 {
        return 0.0;
    }
    px as f64 * MM_PER_INCH / dpi as f64
}

/// Physical page dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    /// Page width in millimeters
    pub width_mm: f64,

    /// Page height in millimeters
    pub height_mm: f64,
}

impl PaperSize {
    /// ISO A3 portrait.
    pub const A3: Self = Self {
        width_mm: 297.0,
        height_mm: 420.0,
    };

    /// ISO A4 portrait, the standard pop sheet.
    ///
    /// | DPI | Pixels |
    /// |-----|--------|
    /// | 72  | 595 x 842 |
    /// | 150 | 1240 x 1754 |
    /// | 300 | 2480 x 3508 |
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// ISO A5 portrait.
    pub const A5: Self = Self {
        width_mm: 148.0,
        height_mm: 210.0,
    };

    /// US Letter portrait.
    pub const LETTER: Self = Self {
        width_mm: 215.9,
        height_mm: 279.4,
    };

    /// Pixel size of this paper at the given resolution.
    pub fn pixel_size(&self, dpi: u32) -> (i64, i64) {
        (mm_to_px(self.width_mm, dpi), mm_to_px(self.height_mm, dpi))
    }

    /// Swap width and height.
    pub fn landscape(self) -> Self {
        Self {
            width_mm: self.height_mm,
            height_mm: self.width_mm,
        }
    }

    /// Parse a paper size string.
    ///
    /// Formats:
    /// - `"a3"`, `"a4"`, `"a5"`, `"letter"` → built-in presets
    /// - `"WIDTHxHEIGHT"` → custom size in millimeters (e.g. `"100x150"`)
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::LETTER),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(|| {
                    format!(
                        "Unknown paper size '{}'. Use 'a4', 'letter' or 'WIDTHxHEIGHT' in mm",
                        s
                    )
                })?;
                let width_mm: f64 = w
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid width: {}", w))?;
                let height_mm: f64 = h
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid height: {}", h))?;
                if width_mm <= 0.0 || height_mm <= 0.0 {
                    return Err(format!("Paper size must be positive: {}", s));
                }
                Ok(Self {
                    width_mm,
                    height_mm,
                })
            }
        }
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Resolution and presentation scale for a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Output resolution in dots per inch
    pub dpi: u32,

    /// Display scale factor. Only affects [`DisplaySize`](crate::render::DisplaySize),
    /// never pixel content.
    pub scale: f64,
}

impl RenderSettings {
    pub fn new(dpi: u32, scale: f64) -> Self {
        Self { dpi, scale }
    }

    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_inch_is_dpi_pixels() {
        assert_eq!(mm_to_px(25.4, 300), 300);
        assert_eq!(mm_to_px(25.4, 72), 72);
        assert_eq!(mm_to_px(25.4, 203), 203);
    }

    #[test]
    fn test_zero_is_zero_at_any_dpi() {
        for dpi in [1, 72, 96, 150, 300, 600, 1200] {
            assert_eq!(mm_to_px(0.0, dpi), 0);
        }
    }

    #[test]
    fn test_monotonic_in_value() {
        let mut prev = mm_to_px(0.0, 300);
        for i in 1..2000 {
            let px = mm_to_px(i as f64 * 0.137, 300);
            assert!(px >= prev, "{} < {} at step {}", px, prev, i);
            prev = px;
        }
    }

    #[test]
    fn test_a4_at_300_dpi() {
        assert_eq!(PaperSize::A4.pixel_size(300), (2480, 3508));
    }

    #[test]
    fn test_rounding_is_per_call() {
        // 1.1mm at 300 DPI = 12.99 px → 13, but 0.55mm = 6.496 → 6 twice = 12.
        // Accepted approximation: sums of rounded parts can differ from the
        // rounded sum.
        assert_eq!(mm_to_px(1.1, 300), 13);
        assert_eq!(mm_to_px(0.55, 300) * 2, 12);
    }

    #[test]
    fn test_negative_half_rounds_up() {
        // 12.7mm at 1 DPI is exactly half a pixel
        assert_eq!(mm_to_px(12.7, 1), 1);
        assert_eq!(mm_to_px(-12.7, 1), 0);
        assert_eq!(mm_to_px(-25.4, 300), -300);
    }

    #[test]
    fn test_px_to_mm_inverse() {
        assert!((px_to_mm(300, 300) - 25.4).abs() < 1e-9);
        assert_eq!(px_to_mm(100, 0), 0.0);
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!(PaperSize::parse("A4").unwrap(), PaperSize::A4);
        assert_eq!(PaperSize::parse("letter").unwrap(), PaperSize::LETTER);
    }

    #[test]
    fn test_parse_custom() {
        let size = PaperSize::parse("100x150").unwrap();
        assert_eq!(size.width_mm, 100.0);
        assert_eq!(size.height_mm, 150.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PaperSize::parse("b9").is_err());
        assert!(PaperSize::parse("0x10").is_err());
        assert!(PaperSize::parse("ax10").is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = RenderSettings::default();
        assert_eq!(settings.dpi, 300);
        assert_eq!(settings.scale, 1.0);
    }
}
