//! Page and pop descriptor types.
//!
//! A [`PageDescriptor`] is plain data: physical size plus an ordered list of
//! [`PopPlacement`]s. Order is paint order, later pops draw over earlier ones.
//!
//! ```
//! use popsheet::sheet::{PageDescriptor, PopContent};
//!
//! let page: PageDescriptor = serde_json::from_str(r#"{
//!     "dimensions": {"widthMm": 210, "heightMm": 297},
//!     "pops": [
//!         {"x": 10, "y": 10, "width": 90, "height": 60,
//!          "pop": {"type": "text", "lines": ["Nevermind", "12.99"]}}
//!     ]
//! }"#).unwrap();
//! assert!(matches!(page.pops[0].pop, PopContent::Text(_)));
//! ```

use serde::{Deserialize, Serialize};

use super::config::PaperSize;
use crate::badge::CustomBadge;

/// Physical dimensions of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl From<PaperSize> for Dimensions {
    fn from(paper: PaperSize) -> Self {
        Self {
            width_mm: paper.width_mm,
            height_mm: paper.height_mm,
        }
    }
}

/// A sheet to rasterize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub dimensions: Dimensions,
    /// Pops in paint order.
    #[serde(default)]
    pub pops: Vec<PopPlacement>,
}

impl PageDescriptor {
    /// An empty page of the given paper size.
    pub fn new(paper: PaperSize) -> Self {
        Self {
            dimensions: paper.into(),
            pops: Vec::new(),
        }
    }

    /// Append a pop on top of the existing ones.
    pub fn with_pop(mut self, placement: PopPlacement) -> Self {
        self.pops.push(placement);
        self
    }
}

/// A pop positioned on the page. All geometry is in millimeters from the
/// page's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub pop: PopContent,
}

impl PopPlacement {
    pub fn new(x: f64, y: f64, width: f64, height: f64, pop: PopContent) -> Self {
        Self {
            x,
            y,
            width,
            height,
            pop,
        }
    }
}

/// What a pop shows. Opaque to the rasterizer; interpreted by the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PopContent {
    Text(TextPop),
    Image(ImagePop),
}

impl PopContent {
    /// Badges attached to this pop, in paint order.
    pub fn badges(&self) -> &[BadgeSlot] {
        match self {
            PopContent::Text(t) => &t.badges,
            PopContent::Image(i) => &i.badges,
        }
    }
}

/// A text card: one or more lines stacked top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPop {
    pub lines: Vec<String>,
    /// Card fill color. `None` leaves the page showing through.
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub badges: Vec<BadgeSlot>,
}

impl TextPop {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// An image card: embedded raster scaled to fit the pop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePop {
    /// `data:` URL or bare base64 image bytes.
    pub src: String,
    #[serde(default)]
    pub badges: Vec<BadgeSlot>,
}

/// A badge attached to a pop: either a catalog reference or embedded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BadgeSlot {
    Ref {
        #[serde(rename = "badgeId")]
        badge_id: String,
    },
    Inline(Box<CustomBadge>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(lines: [&str; 1]) -> PopContent {
        PopContent::Text(TextPop::new(lines))
    }

    #[test]
    fn test_pop_content_is_tagged() {
        let pop = PopContent::Text(TextPop::new(["A", "B"]));
        let json = serde_json::to_value(&pop).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["lines"][1], "B");
    }

    #[test]
    fn test_badge_slot_reference() {
        let slot: BadgeSlot = serde_json::from_str(r#"{"badgeId":"abc"}"#).unwrap();
        assert_eq!(
            slot,
            BadgeSlot::Ref {
                badge_id: "abc".into()
            }
        );
    }

    #[test]
    fn test_badges_accessor() {
        let pop = PopContent::Image(ImagePop {
            src: String::new(),
            badges: vec![BadgeSlot::Ref {
                badge_id: "x".into(),
            }],
        });
        assert_eq!(pop.badges().len(), 1);
    }

    #[test]
    fn test_page_builder_keeps_order() {
        let page = PageDescriptor::new(PaperSize::A4)
            .with_pop(PopPlacement::new(0.0, 0.0, 10.0, 10.0, text(["1"])))
            .with_pop(PopPlacement::new(5.0, 5.0, 10.0, 10.0, text(["2"])));
        assert_eq!(page.dimensions.width_mm, 210.0);
        assert_eq!(page.pops[1].x, 5.0);
    }
}
