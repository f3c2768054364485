use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Canvas, MAX_CANVAS_EDGE, Point, Rect},
    foundation::error::{OverprintError, OverprintResult},
    scene::color::Color,
};

/// Font families a scene may name. Font discovery beyond this list is not supported.
pub const ALLOWED_FONT_FAMILIES: [&str; 5] = [
    "Arial",
    "Courier New",
    "Georgia",
    "Times New Roman",
    "Verdana",
];

/// Largest font size a scene may ask for, in pixels. Glyphs never outgrow the largest canvas.
pub const MAX_TEXT_SIZE_PX: f64 = MAX_CANVAS_EDGE as f64;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A complete declarative description of one composition.
///
/// A scene is immutable for the duration of a render call and self-contained: nothing is
/// inherited from a previous render. Paint order is fixed:
///
/// 1. `background` fills the whole surface,
/// 2. `overlays` in list order (first = bottom-most),
/// 3. `text` above everything.
pub struct Scene {
    /// Output surface dimensions.
    pub canvas: Canvas,
    /// Opaque fill covering the entire surface.
    #[serde(rename = "backgroundColor", default = "default_background")]
    pub background: Color,
    /// Styled text painted above all overlays.
    #[serde(default)]
    pub text: TextBlock,
    /// Placed images in z order (first = bottom-most).
    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Multi-line styled text block.
pub struct TextBlock {
    /// Text content; line breaks split it into independent lines.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// One of [`ALLOWED_FONT_FAMILIES`].
    pub font_family: String,
    /// Line pitch multiplier (`pitch = font_size * line_height`).
    pub line_height: f64,
    /// Horizontal alignment of every line.
    #[serde(rename = "textAlign")]
    pub align: TextAlign,
    /// How the pixel origin of the first line is derived from the canvas.
    pub anchor: TextAnchor,
    /// Vertical meaning of the origin y coordinate.
    pub baseline: TextBaseline,
    /// Accepted and validated, but no wrapping is performed.
    pub max_width: Option<f64>,
    /// Stroke color for the outline pass.
    pub outline_color: Color,
    /// Stroke width in pixels; `0` disables the outline pass.
    pub outline_width_px: f64,
    /// Gradient color at the top of the text block.
    pub gradient_start: Color,
    /// Gradient color at the bottom of the text block.
    pub gradient_end: Color,
    /// Drop shadow for the second fill pass; `None` skips that pass.
    pub shadow: Option<Shadow>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal text alignment.
pub enum TextAlign {
    /// Left edge at `origin.x`.
    Left,
    /// Centered on `canvas.width / 2`.
    #[default]
    Center,
    /// Right edge at `canvas.width - origin.x`.
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// What the origin y coordinate of each line refers to.
pub enum TextBaseline {
    /// Alphabetic baseline (2D canvas default).
    #[default]
    Alphabetic,
    /// Middle of the em box.
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
/// Computes the pixel origin text lines are placed from.
pub enum TextAnchor {
    /// Origin at a percentage of the canvas (`x%` of width, `y%` of height).
    Percent {
        /// Horizontal percentage in `[0, 100]`.
        x: f64,
        /// Vertical percentage in `[0, 100]`.
        y: f64,
    },
    /// Origin at the canvas center shifted down by `offset_y` pixels.
    CanvasCenter {
        /// Vertical offset in pixels (may be negative).
        #[serde(rename = "offsetY")]
        offset_y: f64,
    },
}

impl Default for TextAnchor {
    fn default() -> Self {
        Self::Percent { x: 50.0, y: 50.0 }
    }
}

impl TextAnchor {
    /// Absolute pixel origin for a canvas.
    pub fn origin(self, canvas: Canvas) -> Point {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        match self {
            Self::Percent { x, y } => Point::new(x / 100.0 * w, y / 100.0 * h),
            Self::CanvasCenter { offset_y } => Point::new(w / 2.0, h / 2.0 + offset_y),
        }
    }

    fn validate(self) -> OverprintResult<()> {
        match self {
            Self::Percent { x, y } => {
                for (name, v) in [("x", x), ("y", y)] {
                    if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                        return Err(OverprintError::invalid_scene(format!(
                            "text anchor {name} must be a percentage in [0, 100]"
                        )));
                    }
                }
                Ok(())
            }
            Self::CanvasCenter { offset_y } => {
                if !offset_y.is_finite() {
                    return Err(OverprintError::invalid_scene(
                        "text anchor offsetY must be finite",
                    ));
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Drop shadow applied to the second text fill.
pub struct Shadow {
    /// Shadow color; a transparent color paints nothing.
    pub color: Color,
    /// Blur radius in the 2D-canvas sense (Gaussian sigma = blur / 2).
    pub blur: f64,
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
}

impl Shadow {
    /// Whether the shadow can change any pixel.
    pub fn is_visible(&self) -> bool {
        self.color.is_visible()
            && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One placed raster image.
pub struct Overlay {
    /// Where the image comes from.
    #[serde(rename = "imageSource")]
    pub source: ImageSource,
    /// Left edge in canvas pixels (may be negative or beyond the canvas).
    pub x: f64,
    /// Top edge in canvas pixels (may be negative or beyond the canvas).
    pub y: f64,
    /// Draw width; the image is scaled, not cropped.
    pub width: f64,
    /// Draw height; the image is scaled, not cropped.
    pub height: f64,
    /// Clip shape.
    #[serde(default)]
    pub shape: OverlayShape,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Clip shape of an overlay.
pub enum OverlayShape {
    /// No clipping beyond the bounding box.
    #[default]
    Rectangle,
    /// Circle centered in the box with radius `min(width, height) / 2`.
    Circle,
}

impl OverlayShape {
    /// Circular clip for a box as `(center, radius)`, or `None` for rectangles.
    ///
    /// The circle is centered in the box with radius `min(width, height) / 2`, so a
    /// non-square box gets a circle inscribed against its shorter side.
    pub fn clip_circle(self, rect: Rect) -> Option<(Point, f64)> {
        match self {
            Self::Rectangle => None,
            Self::Circle => Some((rect.center(), rect.width().min(rect.height()) / 2.0)),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Reference to an overlay image.
pub enum ImageSource {
    /// `data:image/...;base64,...` URI.
    DataUri(String),
    /// Path relative to the configured assets root.
    Path(String),
    /// `http(s)` URL; fetching requires the `remote-images` feature.
    Url(String),
    /// Already decoded image handed over by the caller.
    #[serde(skip)]
    Decoded(PreparedImage),
}

impl ImageSource {
    /// Short description for logs and error messages (never the full payload).
    pub fn describe(&self) -> String {
        match self {
            Self::DataUri(s) => format!("data uri ({} bytes)", s.len()),
            Self::Path(p) => format!("path '{p}'"),
            Self::Url(u) => format!("url '{u}'"),
            Self::Decoded(img) => format!("decoded {}x{}", img.width, img.height),
        }
    }
}

impl Overlay {
    /// Bounding box in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn validate(&self, idx: usize) -> OverprintResult<()> {
        for (name, v) in [("x", self.x), ("y", self.y)] {
            if !v.is_finite() {
                return Err(OverprintError::invalid_scene(format!(
                    "overlay {idx} {name} must be finite"
                )));
            }
        }
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(OverprintError::invalid_scene(format!(
                    "overlay {idx} {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for TextBlock {
    fn default() -> Self {
        Self {
            content: String::new(),
            font_size: 24.0,
            font_family: "Arial".to_owned(),
            line_height: 1.2,
            align: TextAlign::Center,
            anchor: TextAnchor::default(),
            baseline: TextBaseline::Alphabetic,
            max_width: None,
            outline_color: Color::BLACK,
            outline_width_px: 0.0,
            gradient_start: Color::WHITE,
            gradient_end: Color::WHITE,
            shadow: None,
        }
    }
}

impl TextBlock {
    /// Split content into lines on `\n`, `\r\n`, or `\r`. Empty lines are kept.
    pub fn lines(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut rest = self.content.as_str();
        while let Some(i) = rest.find(['\n', '\r']) {
            out.push(&rest[..i]);
            let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
            rest = &rest[i + skip..];
        }
        out.push(rest);
        out
    }

    /// Vertical distance between consecutive line origins.
    pub fn line_pitch(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Whether any line contains something to draw.
    pub fn has_glyphs(&self) -> bool {
        self.content.chars().any(|c| !c.is_whitespace())
    }

    fn validate(&self) -> OverprintResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(OverprintError::invalid_scene(
                "text fontSize must be finite and > 0",
            ));
        }
        if self.font_size > MAX_TEXT_SIZE_PX {
            return Err(OverprintError::invalid_scene(format!(
                "text fontSize must be <= {MAX_TEXT_SIZE_PX}"
            )));
        }
        if !ALLOWED_FONT_FAMILIES.contains(&self.font_family.as_str()) {
            return Err(OverprintError::invalid_scene(format!(
                "text fontFamily '{}' is not one of {ALLOWED_FONT_FAMILIES:?}",
                self.font_family
            )));
        }
        if !self.line_height.is_finite() || self.line_height < 0.0 {
            return Err(OverprintError::invalid_scene(
                "text lineHeight must be finite and >= 0",
            ));
        }
        if !self.outline_width_px.is_finite() || self.outline_width_px < 0.0 {
            return Err(OverprintError::invalid_scene(
                "text outlineWidthPx must be finite and >= 0",
            ));
        }
        if let Some(w) = self.max_width
            && (!w.is_finite() || w < 0.0)
        {
            return Err(OverprintError::invalid_scene(
                "text maxWidth must be finite and >= 0",
            ));
        }
        if let Some(s) = &self.shadow {
            if !s.blur.is_finite() || s.blur < 0.0 {
                return Err(OverprintError::invalid_scene(
                    "text shadow blur must be finite and >= 0",
                ));
            }
            if !s.offset_x.is_finite() || !s.offset_y.is_finite() {
                return Err(OverprintError::invalid_scene(
                    "text shadow offsets must be finite",
                ));
            }
        }
        self.anchor.validate()
    }
}

impl Scene {
    /// Empty scene of the given size with the default text block.
    pub fn new(canvas: Canvas, background: Color) -> Self {
        Self {
            canvas,
            background,
            text: TextBlock::default(),
            overlays: Vec::new(),
        }
    }

    /// Parse and validate a JSON scene. Any parse failure is reported as invalid input.
    pub fn from_json(json: &str) -> OverprintResult<Self> {
        let scene: Self = serde_json::from_str(json)
            .map_err(|e| OverprintError::invalid_scene(format!("scene json: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read a JSON scene from disk.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> OverprintResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            OverprintError::invalid_scene(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Check every field range. Runs before any drawing begins.
    pub fn validate(&self) -> OverprintResult<()> {
        self.canvas.validate()?;
        self.text.validate()?;
        for (idx, overlay) in self.overlays.iter().enumerate() {
            overlay.validate(idx)?;
        }
        Ok(())
    }
}

fn default_background() -> Color {
    Color::BLACK
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
