use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::core::MAX_CANVAS_EDGE;
use crate::foundation::error::{OverprintError, OverprintResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Check that the rasterizer can sample this image: non-empty, both edges within
    /// [`MAX_CANVAS_EDGE`], and a pixel buffer of exactly `width * height * 4` bytes.
    pub fn check_drawable(&self) -> OverprintResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OverprintError::decode("image has no pixels"));
        }
        if self.width > MAX_CANVAS_EDGE || self.height > MAX_CANVAS_EDGE {
            return Err(OverprintError::decode(format!(
                "image is {}x{}, edges are limited to {MAX_CANVAS_EDGE}",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba8_premul.len() != expected {
            return Err(OverprintError::decode(format!(
                "image buffer is {} bytes, expected {expected}",
                self.rgba8_premul.len()
            )));
        }
        Ok(())
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> OverprintResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| OverprintError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    let image = PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    };
    image.check_drawable()?;
    Ok(image)
}

/// Split a `data:` URI into its media type and decoded payload.
///
/// Only base64 payloads are accepted; that is what browsers produce for file uploads.
pub fn parse_data_uri(uri: &str) -> OverprintResult<(String, Vec<u8>)> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| OverprintError::decode("data uri must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| OverprintError::decode("data uri is missing ','"))?;
    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(OverprintError::decode("data uri payload must be base64"));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| OverprintError::decode(format!("data uri base64: {e}")))?;
    Ok((mime, bytes))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
