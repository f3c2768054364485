use crate::{
    assets::source::ImageLoader,
    config::OverprintConfig,
    foundation::error::{OverprintError, OverprintResult},
    scene::{
        color::Color,
        model::{
            ImageSource, Overlay, OverlayShape, Scene, TextAlign, TextAnchor, TextBaseline,
            TextBlock,
        },
    },
};

/// Body of `POST /api/generate`. Every field is optional; empty values fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Text drawn below the overlay.
    pub text: Option<String>,
    /// CSS-like background color.
    pub background_color: Option<String>,
    /// CSS-like text color.
    pub font_color: Option<String>,
    /// Font size in pixels; `0` means "use the default".
    pub font_size: Option<f64>,
    /// One of the allow-listed families.
    pub font_family: Option<String>,
    /// Data URI, http(s) URL, or path under the assets root.
    pub overlay_image: Option<String>,
}

impl GenerateRequest {
    /// Parse a request body.
    pub fn from_json(body: &[u8]) -> OverprintResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| OverprintError::serde(format!("request body: {e}")))
    }

    /// Build the 1080×1080 scene for this request.
    ///
    /// The overlay, when present, is decoded here (its natural size drives the layout), so a
    /// bad image fails the request before anything is drawn.
    pub fn to_scene(
        &self,
        cfg: &OverprintConfig,
        loader: &dyn ImageLoader,
    ) -> OverprintResult<Scene> {
        let canvas = cfg.export;
        let defaults = &cfg.defaults;

        let background =
            parse_color_or(self.background_color.as_deref(), defaults.background_color)?;
        let font_color = parse_color_or(self.font_color.as_deref(), defaults.font_color)?;
        let font_size = match self.font_size {
            Some(s) if s != 0.0 => s,
            _ => defaults.font_size,
        };
        let font_family = self
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(defaults.font_family.as_str())
            .to_owned();

        let mut overlays = Vec::new();
        let reference = self
            .overlay_image
            .as_deref()
            .filter(|s| !s.trim().is_empty());
        if let Some(reference) = reference {
            let image = loader.load(&image_reference(reference))?;
            let size = f64::from(
                image
                    .width
                    .min(image.height)
                    .min(cfg.server.overlay_max_px),
            );
            let w = f64::from(canvas.width);
            let h = f64::from(canvas.height);
            overlays.push(Overlay {
                source: ImageSource::Decoded(image),
                x: (w - size) / 2.0,
                y: h / 2.0 - size,
                width: size,
                height: size,
                shape: OverlayShape::Circle,
            });
        }

        let scene = Scene {
            canvas,
            background,
            text: TextBlock {
                content: self.text.clone().unwrap_or_default(),
                font_size,
                font_family,
                align: TextAlign::Center,
                anchor: TextAnchor::CanvasCenter {
                    offset_y: cfg.server.text_offset_y,
                },
                baseline: TextBaseline::Middle,
                gradient_start: font_color,
                gradient_end: font_color,
                outline_width_px: 0.0,
                shadow: None,
                ..TextBlock::default()
            },
            overlays,
        };
        scene.validate()?;
        Ok(scene)
    }
}

/// Classify an overlay reference string.
pub fn image_reference(reference: &str) -> ImageSource {
    let r = reference.trim();
    if r.starts_with("data:") {
        ImageSource::DataUri(r.to_owned())
    } else if r.starts_with("http://") || r.starts_with("https://") {
        ImageSource::Url(r.to_owned())
    } else {
        ImageSource::Path(r.to_owned())
    }
}

fn parse_color_or(value: Option<&str>, fallback: Color) -> OverprintResult<Color> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Color::parse(v),
        None => Ok(fallback),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/server/request.rs"]
mod tests;
