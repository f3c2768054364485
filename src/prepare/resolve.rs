use crate::{
    assets::{decode::PreparedImage, source::ImageLoader},
    foundation::core::{Canvas, Point, Rect},
    foundation::error::{OverprintError, OverprintResult},
    scene::{
        color::Color,
        model::{Overlay, OverlayShape, Scene, TextBlock},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// What `prepare` does when an overlay cannot be resolved or decoded.
pub enum DecodePolicy {
    /// Drop the overlay, record it in [`ResolvedScene::skipped`], and keep going.
    #[default]
    SkipFailed,
    /// Abort with the first decode error.
    FailFast,
}

#[derive(Clone, Debug)]
/// Overlay whose image is already decoded.
pub struct ResolvedOverlay {
    /// Position in `Scene::overlays`.
    pub index: usize,
    /// Decoded pixels.
    pub image: PreparedImage,
    /// Draw box in canvas space.
    pub rect: Rect,
    /// Clip shape.
    pub shape: OverlayShape,
}

impl ResolvedOverlay {
    /// Circular clip as `(center, radius)`, or `None` for rectangles.
    pub fn clip_circle(&self) -> Option<(Point, f64)> {
        self.shape.clip_circle(self.rect)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An overlay dropped under [`DecodePolicy::SkipFailed`].
pub struct SkippedOverlay {
    /// Position in `Scene::overlays`.
    pub index: usize,
    /// Rendered error message.
    pub reason: String,
}

#[derive(Clone, Debug)]
/// A validated scene with every overlay image decoded. Rendering it never performs IO.
pub struct ResolvedScene {
    /// Output surface dimensions.
    pub canvas: Canvas,
    /// Background fill.
    pub background: Color,
    /// Text block, unchanged from the scene.
    pub text: TextBlock,
    /// Decoded overlays in z order.
    pub overlays: Vec<ResolvedOverlay>,
    /// Overlays dropped during preparation.
    pub skipped: Vec<SkippedOverlay>,
}

/// Validate `scene` and decode all of its overlays.
///
/// Validation always fails fast: an invalid scene produces no `ResolvedScene`.
#[tracing::instrument(skip_all, fields(overlays = scene.overlays.len(), policy = ?policy))]
pub fn prepare(
    scene: &Scene,
    loader: &dyn ImageLoader,
    policy: DecodePolicy,
) -> OverprintResult<ResolvedScene> {
    scene.validate()?;

    let mut overlays = Vec::with_capacity(scene.overlays.len());
    let mut skipped = Vec::new();
    for (index, overlay) in scene.overlays.iter().enumerate() {
        match resolve_overlay(index, overlay, loader) {
            Ok(resolved) => overlays.push(resolved),
            Err(err) => match policy {
                DecodePolicy::FailFast => {
                    return Err(match err {
                        OverprintError::Decode(msg) => {
                            OverprintError::decode(format!("overlay {index}: {msg}"))
                        }
                        other => other,
                    });
                }
                DecodePolicy::SkipFailed => {
                    tracing::warn!(
                        index,
                        source = %overlay.source.describe(),
                        error = %err,
                        "skipping overlay"
                    );
                    skipped.push(SkippedOverlay {
                        index,
                        reason: err.to_string(),
                    });
                }
            },
        }
    }

    Ok(ResolvedScene {
        canvas: scene.canvas,
        background: scene.background,
        text: scene.text.clone(),
        overlays,
        skipped,
    })
}

fn resolve_overlay(
    index: usize,
    overlay: &Overlay,
    loader: &dyn ImageLoader,
) -> OverprintResult<ResolvedOverlay> {
    let image = loader.load(&overlay.source)?;
    image.check_drawable()?;
    Ok(ResolvedOverlay {
        index,
        image,
        rect: overlay.rect(),
        shape: overlay.shape,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/prepare/resolve.rs"]
mod tests;
