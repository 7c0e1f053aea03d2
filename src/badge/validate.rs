//! Badge validation.
//!
//! `validate_name` and `validate_text` are pure: they only look at the value
//! they are given, so an editor can run them before submitting. Name
//! uniqueness depends on the catalog and is checked by the store.

use thiserror::Error;

use super::model::{BadgeKind, CustomBadge};

pub const NAME_MAX_CHARS: usize = 20;
pub const TEXT_MAX_CHARS: usize = 10;
pub const SIZE_RANGE_MM: (f64, f64) = (10.0, 50.0);
pub const BORDER_RADIUS_RANGE_MM: (f64, f64) = (0.0, 10.0);
pub const FONT_SIZE_RANGE_PX: (f64, f64) = (8.0, 24.0);
pub const BORDER_WIDTH_RANGE_MM: (f64, f64) = (0.5, 3.0);
pub const CROP_RANGE: (f64, f64) = (0.0, 1.0);

/// A badge field failed its bounds check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Badge name is required")]
    NameEmpty,

    #[error("Badge name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("Badge text is required")]
    TextEmpty,

    #[error("Badge text must be at most {max} characters")]
    TextTooLong { max: usize },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Image badges require image data")]
    MissingImage,
}

/// Check that a name is non-blank and at most [`NAME_MAX_CHARS`] characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong {
            max: NAME_MAX_CHARS,
        });
    }
    Ok(())
}

/// Check that badge text is non-blank and at most [`TEXT_MAX_CHARS`] characters.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::TextEmpty);
    }
    if text.chars().count() > TEXT_MAX_CHARS {
        return Err(ValidationError::TextTooLong {
            max: TEXT_MAX_CHARS,
        });
    }
    Ok(())
}

/// Validate a fully defaulted badge before it is written.
pub fn validate_badge(badge: &CustomBadge) -> Result<(), ValidationError> {
    validate_name(&badge.name)?;

    check_range("width", badge.width, SIZE_RANGE_MM)?;
    check_range("height", badge.height, SIZE_RANGE_MM)?;
    check_range("borderRadius", badge.border_radius, BORDER_RADIUS_RANGE_MM)?;
    check_range("borderWidth", badge.border_width, BORDER_WIDTH_RANGE_MM)?;

    match badge.kind {
        BadgeKind::Text => {
            validate_text(&badge.text)?;
            check_range("fontSize", badge.font_size, FONT_SIZE_RANGE_PX)?;
        }
        BadgeKind::Image => {
            let image = badge
                .image_settings
                .as_ref()
                .filter(|image| !image.src.trim().is_empty())
                .ok_or(ValidationError::MissingImage)?;
            if let Some(crop) = &image.crop {
                check_range("crop.x", crop.x, CROP_RANGE)?;
                check_range("crop.y", crop.y, CROP_RANGE)?;
                check_range("crop.width", crop.width, CROP_RANGE)?;
                check_range("crop.height", crop.height, CROP_RANGE)?;
            }
        }
    }

    Ok(())
}

fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ValidationError> {
    // NaN fails both comparisons and must be rejected too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
