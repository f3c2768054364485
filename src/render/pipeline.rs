use crate::{
    assets::{
        fonts::{FontLibrary, TextLayoutEngine},
        source::ImageLoader,
    },
    foundation::error::OverprintResult,
    prepare::resolve::{DecodePolicy, ResolvedScene, prepare},
    render::{compositor::draw_overlays, surface::Surface, text::draw_text},
    scene::model::Scene,
};

/// CPU renderer for resolved scenes.
///
/// Owns the font library and a Parley layout context, both reused across renders. Nothing
/// else carries over between calls: every render allocates a fresh surface.
///
/// Pipeline:
/// 1. allocate a transparent surface of the scene's canvas size,
/// 2. fill it with the background color,
/// 3. paint overlays in list order,
/// 4. paint the text block,
/// 5. return the surface.
pub struct Renderer {
    fonts: FontLibrary,
    engine: TextLayoutEngine,
}

impl Renderer {
    /// Renderer drawing text with `fonts`.
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
        }
    }

    /// Fonts available to text rendering.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Render a prepared scene. Never performs IO.
    #[tracing::instrument(skip_all, fields(
        width = scene.canvas.width,
        height = scene.canvas.height,
        overlays = scene.overlays.len(),
    ))]
    pub fn render(&mut self, scene: &ResolvedScene) -> OverprintResult<Surface> {
        let mut surface = Surface::new(scene.canvas)?;
        surface.fill(scene.background.to_premul());
        draw_overlays(&mut surface, &scene.overlays)?;
        draw_text(&mut surface, &scene.text, &self.fonts, &mut self.engine)?;
        Ok(surface)
    }

    /// Prepare and render in one call.
    pub fn render_scene(
        &mut self,
        scene: &Scene,
        loader: &dyn ImageLoader,
        policy: DecodePolicy,
    ) -> OverprintResult<Surface> {
        let resolved = prepare(scene, loader, policy)?;
        self.render(&resolved)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
