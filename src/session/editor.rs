use std::path::{Path, PathBuf};

use crate::{
    assets::source::ImageLoader,
    config::OverprintConfig,
    export::png::{to_data_url, write_download},
    foundation::core::Canvas,
    foundation::error::{OverprintError, OverprintResult},
    prepare::resolve::{DecodePolicy, SkippedOverlay, prepare},
    render::{pipeline::Renderer, surface::Surface},
    scene::{
        color::Color,
        fingerprint::{SceneFingerprint, fingerprint_scene},
        model::{
            ALLOWED_FONT_FAMILIES, ImageSource, Overlay, OverlayShape, Scene, Shadow, TextAlign,
            TextAnchor, TextBaseline, TextBlock,
        },
    },
};

/// Smallest font size the editor accepts.
pub const MIN_FONT_SIZE: f64 = 10.0;
/// Largest font size the editor accepts.
pub const MAX_FONT_SIZE: f64 = 100.0;

/// Scene the editor starts from.
pub fn default_scene(canvas: Canvas) -> Scene {
    Scene {
        canvas,
        background: Color::rgb(0x1e, 0x1e, 0x1e),
        text: TextBlock {
            content: "Enter your text here".to_owned(),
            font_size: 24.0,
            font_family: "Arial".to_owned(),
            line_height: 1.2,
            align: TextAlign::Center,
            anchor: TextAnchor::Percent { x: 50.0, y: 50.0 },
            baseline: TextBaseline::Alphabetic,
            max_width: Some(90.0),
            outline_color: Color::BLACK,
            outline_width_px: 2.0,
            gradient_start: Color::rgb(0xff, 0, 0),
            gradient_end: Color::rgb(0, 0, 0xff),
            shadow: Some(Shadow {
                color: Color::rgba(0, 0, 0, 128),
                blur: 4.0,
                offset_x: 2.0,
                offset_y: 2.0,
            }),
        },
        overlays: Vec::new(),
    }
}

/// Field changes for one overlay; `None` leaves a field as it is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayPatch {
    /// New left edge.
    pub x: Option<f64>,
    /// New top edge.
    pub y: Option<f64>,
    /// New width, clamped to at least 1.
    pub width: Option<f64>,
    /// New height, clamped to at least 1.
    pub height: Option<f64>,
    /// New clip shape.
    pub shape: Option<OverlayShape>,
}

#[derive(Clone, Debug)]
struct Frame {
    fingerprint: SceneFingerprint,
    surface: Surface,
    skipped: Vec<SkippedOverlay>,
}

/// Interactive editing state: the current scene plus the last rendered frame.
///
/// Inputs are clamped here, at the boundary, so the scene handed to the renderer is always
/// valid. Rendering is explicit: nothing is drawn until [`EditorSession::render`] (or an
/// export) is called, and an unchanged scene reuses the previous frame.
pub struct EditorSession {
    scene: Scene,
    renderer: Renderer,
    loader: Box<dyn ImageLoader>,
    frame: Option<Frame>,
}

impl EditorSession {
    /// Session on the default preview scene.
    pub fn new(renderer: Renderer, loader: impl ImageLoader + 'static) -> Self {
        Self::with_scene(default_scene(Canvas::PREVIEW), renderer, loader)
    }

    /// Session on an explicit starting scene.
    pub fn with_scene(
        scene: Scene,
        renderer: Renderer,
        loader: impl ImageLoader + 'static,
    ) -> Self {
        Self {
            scene,
            renderer,
            loader: Box::new(loader),
            frame: None,
        }
    }

    /// Session using the configured preview canvas, fonts and assets root.
    pub fn from_config(cfg: &OverprintConfig) -> OverprintResult<Self> {
        Ok(Self::with_scene(
            default_scene(cfg.preview),
            Renderer::new(cfg.font_library()?),
            cfg.asset_resolver(),
        ))
    }

    /// Current scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Whether the scene changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.frame
            .as_ref()
            .is_none_or(|f| f.fingerprint != fingerprint_scene(&self.scene))
    }

    /// Overlays dropped by the last render.
    pub fn skipped(&self) -> &[SkippedOverlay] {
        self.frame
            .as_ref()
            .map(|f| f.skipped.as_slice())
            .unwrap_or_default()
    }

    /// Replace the text content.
    pub fn set_text(&mut self, content: impl Into<String>) {
        self.scene.text.content = content.into();
    }

    /// Replace the background color.
    pub fn set_background(&mut self, color: Color) {
        self.scene.background = color;
    }

    /// Clamped to `MIN_FONT_SIZE..=MAX_FONT_SIZE`; non-finite input is ignored.
    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() {
            self.scene.text.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        }
    }

    /// Only allow-listed families are accepted.
    pub fn set_font_family(&mut self, family: &str) -> OverprintResult<()> {
        if !ALLOWED_FONT_FAMILIES.contains(&family) {
            return Err(OverprintError::invalid_scene(format!(
                "font family '{family}' is not one of {ALLOWED_FONT_FAMILIES:?}"
            )));
        }
        self.scene.text.font_family = family.to_owned();
        Ok(())
    }

    /// Text origin as canvas percentages, each clamped to `[0, 100]`.
    pub fn set_position(&mut self, x: f64, y: f64) {
        let TextAnchor::Percent { x: cur_x, y: cur_y } = self.scene.text.anchor else {
            self.scene.text.anchor = TextAnchor::Percent {
                x: clamp_percent(x, 50.0),
                y: clamp_percent(y, 50.0),
            };
            return;
        };
        self.scene.text.anchor = TextAnchor::Percent {
            x: clamp_percent(x, cur_x),
            y: clamp_percent(y, cur_y),
        };
    }

    /// Negative values become `0`; non-finite input is ignored.
    pub fn set_line_height(&mut self, line_height: f64) {
        if line_height.is_finite() {
            self.scene.text.line_height = line_height.max(0.0);
        }
    }

    /// Stored for a future wrapping policy; it does not affect rendering.
    pub fn set_max_width(&mut self, max_width: Option<f64>) {
        self.scene.text.max_width = max_width.filter(|w| w.is_finite()).map(|w| w.max(0.0));
    }

    /// Horizontal alignment of every line.
    pub fn set_align(&mut self, align: TextAlign) {
        self.scene.text.align = align;
    }

    /// Outline color and width; a negative width is treated as `0` (no outline).
    pub fn set_outline(&mut self, color: Color, width_px: f64) {
        self.scene.text.outline_color = color;
        if width_px.is_finite() {
            self.scene.text.outline_width_px = width_px.max(0.0);
        }
    }

    /// Top and bottom colors of the text gradient.
    pub fn set_gradient(&mut self, start: Color, end: Color) {
        self.scene.text.gradient_start = start;
        self.scene.text.gradient_end = end;
    }

    /// Replace the shadow. Negative blur becomes `0`; non-finite offsets become `0`.
    pub fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.scene.text.shadow = shadow.map(|s| Shadow {
            color: s.color,
            blur: if s.blur.is_finite() { s.blur.max(0.0) } else { 0.0 },
            offset_x: if s.offset_x.is_finite() { s.offset_x } else { 0.0 },
            offset_y: if s.offset_y.is_finite() { s.offset_y } else { 0.0 },
        });
    }

    /// Current overlays in z order.
    pub fn overlays(&self) -> &[Overlay] {
        &self.scene.overlays
    }

    /// Decode `source` and append it as a 100×100 rectangle at the origin.
    ///
    /// The image is decoded once, here. On failure the overlay list is left unchanged.
    pub fn add_overlay(&mut self, source: ImageSource) -> OverprintResult<usize> {
        let image = self.loader.load(&source)?;
        self.scene.overlays.push(Overlay {
            source: ImageSource::Decoded(image),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            shape: OverlayShape::Rectangle,
        });
        let index = self.scene.overlays.len() - 1;
        tracing::debug!(index, source = %source.describe(), "added overlay");
        Ok(index)
    }

    /// Apply `patch` to the overlay at `index`.
    pub fn update_overlay(&mut self, index: usize, patch: OverlayPatch) -> OverprintResult<()> {
        let overlay = self
            .scene
            .overlays
            .get_mut(index)
            .ok_or_else(|| no_such_overlay(index))?;
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            overlay.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            overlay.y = y;
        }
        if let Some(w) = patch.width.filter(|v| v.is_finite()) {
            overlay.width = w.max(1.0);
        }
        if let Some(h) = patch.height.filter(|v| v.is_finite()) {
            overlay.height = h.max(1.0);
        }
        if let Some(shape) = patch.shape {
            overlay.shape = shape;
        }
        Ok(())
    }

    /// Remove and return the overlay at `index`. Later overlays keep their relative order.
    pub fn remove_overlay(&mut self, index: usize) -> OverprintResult<Overlay> {
        if index >= self.scene.overlays.len() {
            return Err(no_such_overlay(index));
        }
        Ok(self.scene.overlays.remove(index))
    }

    /// Remove every overlay.
    pub fn clear_overlays(&mut self) {
        self.scene.overlays.clear();
    }

    /// Render the current scene, reusing the last frame when nothing changed.
    ///
    /// On error the previous frame is kept.
    pub fn render(&mut self) -> OverprintResult<&Surface> {
        let fingerprint = fingerprint_scene(&self.scene);
        let fresh = self
            .frame
            .as_ref()
            .is_some_and(|f| f.fingerprint == fingerprint);
        if !fresh {
            let resolved = prepare(&self.scene, self.loader.as_ref(), DecodePolicy::SkipFailed)?;
            let surface = self.renderer.render(&resolved)?;
            self.frame = Some(Frame {
                fingerprint,
                surface,
                skipped: resolved.skipped,
            });
        } else {
            tracing::trace!("scene unchanged; reusing frame");
        }
        self.frame
            .as_ref()
            .map(|f| &f.surface)
            .ok_or_else(|| OverprintError::Other(anyhow::anyhow!("no frame after render")))
    }

    /// Snapshot of the current scene as a PNG data URL.
    pub fn generate_image(&mut self) -> OverprintResult<String> {
        let surface = self.render()?;
        to_data_url(surface)
    }

    /// Write the current scene as `generated-image.png` inside `dir`.
    pub fn download(&mut self, dir: &Path) -> OverprintResult<PathBuf> {
        let surface = self.render()?;
        write_download(surface, dir)
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("scene", &self.scene)
            .field("rendered", &self.frame.is_some())
            .finish_non_exhaustive()
    }
}

fn clamp_percent(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        fallback
    }
}

fn no_such_overlay(index: usize) -> OverprintError {
    OverprintError::invalid_scene(format!("no overlay at index {index}"))
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
