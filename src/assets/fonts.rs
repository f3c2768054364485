use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::{
    foundation::error::{OverprintError, OverprintResult},
    scene::model::ALLOWED_FONT_FAMILIES,
};

#[derive(Clone)]
/// Font bytes registered under one allow-listed family name.
pub struct FontFace {
    /// Allow-list family name this face answers to.
    pub family: String,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    font_data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    pub(crate) fn blob(&self) -> &vello_cpu::peniko::Blob<u8> {
        &self.font_data.data
    }
}

/// Fixed font allow-list mapped to font files.
///
/// Families without a registered face can only be used with empty text.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    faces: BTreeMap<String, FontFace>,
}

impl FontLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes for an allow-listed family, replacing any previous face.
    pub fn insert(&mut self, family: &str, bytes: Vec<u8>) -> OverprintResult<()> {
        if !ALLOWED_FONT_FAMILIES.contains(&family) {
            return Err(OverprintError::font(format!(
                "font family '{family}' is not in the allow-list"
            )));
        }
        if bytes.is_empty() {
            return Err(OverprintError::font(format!(
                "font file for '{family}' is empty"
            )));
        }
        let bytes = Arc::new(bytes);
        // One blob backs both the rasterizer and the shaper, no second copy of the file.
        let blob = vello_cpu::peniko::Blob::new(bytes.clone());
        let font_data = vello_cpu::peniko::FontData::new(blob, 0);
        self.faces.insert(
            family.to_owned(),
            FontFace {
                family: family.to_owned(),
                bytes,
                font_data,
            },
        );
        Ok(())
    }

    /// Load every `family -> file` entry. Relative paths resolve against `base_dir`.
    pub fn from_files<'a>(
        files: impl IntoIterator<Item = (&'a String, &'a std::path::PathBuf)>,
        base_dir: &Path,
    ) -> OverprintResult<Self> {
        let mut lib = Self::new();
        for (family, path) in files {
            let full = if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            };
            let bytes = std::fs::read(&full).map_err(|e| {
                OverprintError::font(format!(
                    "failed to read font for '{family}' at '{}': {e}",
                    full.display()
                ))
            })?;
            lib.insert(family, bytes)?;
            tracing::debug!(family = %family, path = %full.display(), "registered font");
        }
        Ok(lib)
    }

    /// Face for a family, if one is registered.
    pub fn face(&self, family: &str) -> Option<&FontFace> {
        self.faces.get(family)
    }

    /// Registered family names in sorted order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// One shaped line, positioned relative to its own start and baseline.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShapedLine {
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
    pub(crate) width: f64,
    pub(crate) ascent: f64,
    pub(crate) descent: f64,
}

/// Stateful helper for shaping single lines with Parley.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_names: HashMap<String, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family_names: HashMap::new(),
        }
    }

    fn family_name_for(&mut self, face: &FontFace) -> OverprintResult<String> {
        if let Some(name) = self.family_names.get(&face.family) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(face.blob().clone(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            OverprintError::font(format!(
                "no font families registered from font bytes for '{}'",
                face.family
            ))
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| OverprintError::font("registered font family has no name"))?
            .to_string();
        self.family_names
            .insert(face.family.clone(), family_name.clone());
        Ok(family_name)
    }

    /// Shape one line of text without wrapping.
    pub(crate) fn shape_line(
        &mut self,
        face: &FontFace,
        text: &str,
        size_px: f32,
    ) -> OverprintResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(OverprintError::invalid_scene(
                "text size must be finite and > 0",
            ));
        }
        let family_name = self.family_name_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedLine {
            width: f64::from(layout.width()),
            ..ShapedLine::default()
        };
        for (i, line) in layout.lines().enumerate() {
            let m = line.metrics();
            if i == 0 {
                out.ascent = f64::from(m.ascent);
                out.descent = f64::from(m.descent);
            }
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.glyphs
                    .extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y - m.baseline,
                    }));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
