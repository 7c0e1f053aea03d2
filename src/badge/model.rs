//! Badge entity types.
//!
//! All types derive `Serialize + Deserialize` with camelCase field names, so
//! the catalog document on disk uses the same shape as the editor input.
//!
//! ## Defaulting
//!
//! [`CustomBadgeInput`] carries every optional field as `Option`. When it is
//! turned into a [`CustomBadge`], each field is resolved with an explicit
//! policy:
//!
//! | Field | Fallback trigger | Default |
//! |-------|------------------|---------|
//! | `shape` | missing | `circle` |
//! | `width`, `height` | missing or `0` | 20mm |
//! | `borderRadius` | missing or `0` | 2mm |
//! | `text` | missing or empty | `"NEW"` |
//! | `backgroundColor` | missing or empty | `#e53935` |
//! | `textColor` | missing or empty | `#ffffff` |
//! | `fontSize` | missing or `0` | 12px |
//! | `borderEnabled` | **missing only** | `true` |
//! | `borderColor` | missing or empty | `#ffffff` |
//! | `borderWidth` | missing or `0` | 1mm |
//! | `badgeAlign` | missing | `right` |
//! | `badgeVerticalAlign` | missing | `top` |
//!
//! Scalars fall back when missing *or* zero/empty; booleans only when missing,
//! so an explicit `borderEnabled: false` survives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHAPE: BadgeShape = BadgeShape::Circle;
pub const DEFAULT_WIDTH_MM: f64 = 20.0;
pub const DEFAULT_HEIGHT_MM: f64 = 20.0;
pub const DEFAULT_BORDER_RADIUS_MM: f64 = 2.0;
pub const DEFAULT_TEXT: &str = "NEW";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#e53935";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_FONT_SIZE_PX: f64 = 12.0;
pub const DEFAULT_BORDER_ENABLED: bool = true;
pub const DEFAULT_BORDER_COLOR: &str = "#ffffff";
pub const DEFAULT_BORDER_WIDTH_MM: f64 = 1.0;
pub const DEFAULT_ALIGN: BadgeAlign = BadgeAlign::Right;
pub const DEFAULT_VERTICAL_ALIGN: BadgeVerticalAlign = BadgeVerticalAlign::Top;

/// Badge variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Text,
    Image,
}

/// Outline of the badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeShape {
    /// Ellipse inscribed in the badge box (a circle when width == height).
    #[default]
    Circle,
    /// Box with `borderRadius` corners.
    Rectangle,
}

/// Horizontal anchoring within the host area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeAlign {
    Left,
    Center,
    #[default]
    Right,
}

/// Vertical anchoring within the host area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Crop rectangle as fractions of the original image, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Embedded raster for image badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    /// Image data, usually a `data:image/png;base64,...` URL.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub original_width: u32,
    pub original_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<Crop>,
}

/// A reusable badge definition stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBadge {
    /// Opaque identifier, assigned at creation and never changed.
    pub id: String,
    /// Unique display name (1–20 characters).
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    pub shape: BadgeShape,
    /// Width in millimeters.
    pub width: f64,
    /// Height in millimeters.
    pub height: f64,
    /// Corner radius in millimeters; only used by rectangles.
    pub border_radius: f64,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
    /// Font size in CSS pixels.
    pub font_size: f64,
    pub border_enabled: bool,
    pub border_color: String,
    /// Border width in millimeters.
    pub border_width: f64,
    pub badge_align: BadgeAlign,
    pub badge_vertical_align: BadgeVerticalAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_settings: Option<ImageSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Drawable content of a badge, one arm per [`BadgeKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BadgeContent<'a> {
    Text {
        text: &'a str,
        background_color: &'a str,
        text_color: &'a str,
        font_size: f64,
    },
    Image(&'a ImageSettings),
}

impl CustomBadge {
    /// The variant-specific content, or `None` for an image badge that has
    /// lost its image settings.
    pub fn content(&self) -> Option<BadgeContent<'_>> {
        match self.kind {
            BadgeKind::Text => Some(BadgeContent::Text {
                text: &self.text,
                background_color: &self.background_color,
                text_color: &self.text_color,
                font_size: self.font_size,
            }),
            BadgeKind::Image => self.image_settings.as_ref().map(BadgeContent::Image),
        }
    }

    /// Rebuild the badge from `input`, keeping identity and creation time.
    pub(crate) fn overwrite(&mut self, input: CustomBadgeInput, now: DateTime<Utc>) {
        let id = std::mem::take(&mut self.id);
        *self = input.into_badge(id, self.created_at, now);
    }
}

/// Editor input for creating or replacing a badge.
///
/// Mirrors [`CustomBadge`] without identity and timestamps. Unset fields are
/// filled from the defaults table in the module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBadgeInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    pub shape: Option<BadgeShape>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub border_radius: Option<f64>,
    pub text: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_size: Option<f64>,
    pub border_enabled: Option<bool>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub badge_align: Option<BadgeAlign>,
    pub badge_vertical_align: Option<BadgeVerticalAlign>,
    pub image_settings: Option<ImageSettings>,
}

impl CustomBadgeInput {
    /// A text badge with every optional field unset.
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::empty(name, BadgeKind::Text)
        }
    }

    /// An image badge with every optional field unset.
    pub fn image(name: impl Into<String>, image: ImageSettings) -> Self {
        Self {
            image_settings: Some(image),
            ..Self::empty(name, BadgeKind::Image)
        }
    }

    fn empty(name: impl Into<String>, kind: BadgeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            shape: None,
            width: None,
            height: None,
            border_radius: None,
            text: None,
            background_color: None,
            text_color: None,
            font_size: None,
            border_enabled: None,
            border_color: None,
            border_width: None,
            badge_align: None,
            badge_vertical_align: None,
            image_settings: None,
        }
    }

    /// Apply the defaults table and stamp identity.
    pub(crate) fn into_badge(
        self,
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> CustomBadge {
        CustomBadge {
            id,
            name: self.name,
            kind: self.kind,
            shape: self.shape.unwrap_or(DEFAULT_SHAPE),
            width: number_or(self.width, DEFAULT_WIDTH_MM),
            height: number_or(self.height, DEFAULT_HEIGHT_MM),
            border_radius: number_or(self.border_radius, DEFAULT_BORDER_RADIUS_MM),
            text: string_or(self.text, DEFAULT_TEXT),
            background_color: string_or(self.background_color, DEFAULT_BACKGROUND_COLOR),
            text_color: string_or(self.text_color, DEFAULT_TEXT_COLOR),
            font_size: number_or(self.font_size, DEFAULT_FONT_SIZE_PX),
            border_enabled: self.border_enabled.unwrap_or(DEFAULT_BORDER_ENABLED),
            border_color: string_or(self.border_color, DEFAULT_BORDER_COLOR),
            border_width: number_or(self.border_width, DEFAULT_BORDER_WIDTH_MM),
            badge_align: self.badge_align.unwrap_or(DEFAULT_ALIGN),
            badge_vertical_align: self.badge_vertical_align.unwrap_or(DEFAULT_VERTICAL_ALIGN),
            image_settings: self.image_settings,
            created_at,
            updated_at,
        }
    }
}

impl From<&CustomBadge> for CustomBadgeInput {
    fn from(badge: &CustomBadge) -> Self {
        Self {
            name: badge.name.clone(),
            kind: badge.kind,
            shape: Some(badge.shape),
            width: Some(badge.width),
            height: Some(badge.height),
            border_radius: Some(badge.border_radius),
            text: Some(badge.text.clone()),
            background_color: Some(badge.background_color.clone()),
            text_color: Some(badge.text_color.clone()),
            font_size: Some(badge.font_size),
            border_enabled: Some(badge.border_enabled),
            border_color: Some(badge.border_color.clone()),
            border_width: Some(badge.border_width),
            badge_align: Some(badge.badge_align),
            badge_vertical_align: Some(badge.badge_vertical_align),
            image_settings: badge.image_settings.clone(),
        }
    }
}

/// Present and non-zero, otherwise the default.
fn number_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => default,
    }
}

/// Present and non-empty, otherwise the default.
fn string_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: CustomBadgeInput) -> CustomBadge {
        let now = Utc::now();
        input.into_badge("b1".into(), now, now)
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let badge = resolve(CustomBadgeInput::text("Sale", "SALE"));
        assert_eq!(badge.shape, BadgeShape::Circle);
        assert_eq!(badge.width, DEFAULT_WIDTH_MM);
        assert_eq!(badge.height, DEFAULT_HEIGHT_MM);
        assert_eq!(badge.font_size, DEFAULT_FONT_SIZE_PX);
        assert_eq!(badge.background_color, DEFAULT_BACKGROUND_COLOR);
        assert!(badge.border_enabled);
        assert_eq!(badge.badge_align, BadgeAlign::Right);
        assert_eq!(badge.badge_vertical_align, BadgeVerticalAlign::Top);
    }

    #[test]
    fn test_falsy_scalars_use_defaults() {
        let badge = resolve(CustomBadgeInput {
            width: Some(0.0),
            text: Some(String::new()),
            text_color: Some(String::new()),
            border_width: Some(0.0),
            ..CustomBadgeInput::text("Sale", "")
        });
        assert_eq!(badge.width, DEFAULT_WIDTH_MM);
        assert_eq!(badge.text, DEFAULT_TEXT);
        assert_eq!(badge.text_color, DEFAULT_TEXT_COLOR);
        assert_eq!(badge.border_width, DEFAULT_BORDER_WIDTH_MM);
    }

    #[test]
    fn test_explicit_false_border_survives() {
        let badge = resolve(CustomBadgeInput {
            border_enabled: Some(false),
            ..CustomBadgeInput::text("Sale", "SALE")
        });
        assert!(!badge.border_enabled);
    }

    #[test]
    fn test_explicit_values_win() {
        let badge = resolve(CustomBadgeInput {
            shape: Some(BadgeShape::Rectangle),
            width: Some(35.0),
            background_color: Some("#000".into()),
            badge_align: Some(BadgeAlign::Left),
            ..CustomBadgeInput::text("Sale", "SALE")
        });
        assert_eq!(badge.shape, BadgeShape::Rectangle);
        assert_eq!(badge.width, 35.0);
        assert_eq!(badge.background_color, "#000");
        assert_eq!(badge.badge_align, BadgeAlign::Left);
    }

    #[test]
    fn test_content_arms() {
        let text = resolve(CustomBadgeInput::text("Sale", "SALE"));
        assert!(matches!(
            text.content(),
            Some(BadgeContent::Text { text: "SALE", .. })
        ));

        let mut image = resolve(CustomBadgeInput::image(
            "Logo",
            ImageSettings {
                src: "data:image/png;base64,AAAA".into(),
                file_name: None,
                original_width: 4,
                original_height: 4,
                crop: None,
            },
        ));
        assert!(matches!(image.content(), Some(BadgeContent::Image(_))));
        image.image_settings = None;
        assert_eq!(image.content(), None);
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let badge = resolve(CustomBadgeInput::text("Sale", "SALE"));
        let json = serde_json::to_value(&badge).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["borderEnabled"], true);
        assert_eq!(json["badgeVerticalAlign"], "top");
        assert!(json.get("imageSettings").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_input_deserializes_with_missing_fields() {
        let input: CustomBadgeInput =
            serde_json::from_str(r#"{"name":"Hot","type":"text","borderEnabled":false}"#)
                .unwrap();
        assert_eq!(input.border_enabled, Some(false));
        assert_eq!(input.width, None);
    }

    #[test]
    fn test_overwrite_keeps_identity() {
        let mut badge = resolve(CustomBadgeInput::text("Sale", "SALE"));
        let created = badge.created_at;
        let later = created + chrono::Duration::seconds(5);
        badge.overwrite(CustomBadgeInput::text("Promo", "50%"), later);
        assert_eq!(badge.id, "b1");
        assert_eq!(badge.name, "Promo");
        assert_eq!(badge.created_at, created);
        assert_eq!(badge.updated_at, later);
    }
}
