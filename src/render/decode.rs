//! Decoding embedded image data.
//!
//! Badges and image pops carry their pixels inline, either as a
//! `data:<mime>;base64,<payload>` URL or as bare base64.

use base64::Engine;
use image::DynamicImage;

use super::RenderError;

/// Decode a `data:` URL (or bare base64) into an image.
pub fn decode_image_src(src: &str) -> Result<DynamicImage, RenderError> {
    let payload = match src.trim().strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest
                .split_once(',')
                .ok_or_else(|| RenderError::Decode("data URL has no payload".into()))?;
            if !meta.ends_with(";base64") {
                return Err(RenderError::Decode(format!(
                    "unsupported data URL encoding '{}'",
                    meta
                )));
            }
            data
        }
        None => src.trim(),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::Decode(format!("invalid base64: {}", e)))?;

    image::load_from_memory(&bytes).map_err(|e| RenderError::Decode(e.to_string()))
}
