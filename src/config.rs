//! Runtime configuration.
//!
//! Canvas sizes, font files, and server fallbacks are read from here and handed to the
//! renderer and server explicitly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    assets::{fonts::FontLibrary, source::AssetResolver},
    foundation::core::Canvas,
    foundation::error::{OverprintError, OverprintResult},
    scene::{color::Color, model::ALLOWED_FONT_FAMILIES},
};

/// Top-level configuration, loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverprintConfig {
    /// Interactive preview surface.
    pub preview: Canvas,

    /// Server export surface.
    pub export: Canvas,

    /// Font file per allow-listed family.
    pub fonts: BTreeMap<String, PathBuf>,

    /// Root directory for relative overlay image paths.
    pub assets_root: PathBuf,

    /// HTTP endpoint settings.
    pub server: ServerConfig,

    /// Fallbacks for fields a server request leaves out.
    pub defaults: RequestDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// HTTP endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:3000`.
    pub bind: String,

    /// Largest accepted request body.
    pub max_body_bytes: usize,

    /// Upper bound for the overlay edge length.
    pub overlay_max_px: u32,

    /// Text origin offset below the canvas center.
    pub text_offset_y: f64,
}

/// Fallback values for server requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestDefaults {
    /// Background when `backgroundColor` is missing.
    pub background_color: Color,

    /// Text color when `fontColor` is missing.
    pub font_color: Color,

    /// Font size when `fontSize` is missing.
    pub font_size: f64,

    /// Family when `fontFamily` is missing.
    pub font_family: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "overprint=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for OverprintConfig {
    fn default() -> Self {
        Self {
            preview: Canvas::PREVIEW,
            export: Canvas::EXPORT,
            fonts: BTreeMap::new(),
            assets_root: PathBuf::from("."),
            server: ServerConfig::default(),
            defaults: RequestDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_body_bytes: 16 * 1024 * 1024,
            overlay_max_px: 200,
            text_offset_y: 30.0,
        }
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            background_color: Color::BLACK,
            font_color: Color::WHITE,
            font_size: 40.0,
            font_family: "Arial".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl OverprintConfig {
    /// Parse a JSON config. Relative paths are kept as written.
    pub fn from_json(json: &str) -> OverprintResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| OverprintError::config(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config file. Relative font and asset paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> OverprintResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            OverprintError::config(format!("failed to read '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_json(&json)?;
        if let Some(dir) = path.parent() {
            cfg.resolve_relative_to(dir);
        }
        tracing::debug!(path = %path.display(), fonts = cfg.fonts.len(), "loaded config");
        Ok(cfg)
    }

    /// Load `path` when given, falling back to defaults with a warning on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Make relative paths absolute against `dir`.
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        for path in self.fonts.values_mut() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        if self.assets_root.is_relative() {
            self.assets_root = dir.join(&self.assets_root);
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> OverprintResult<()> {
        self.preview
            .validate()
            .map_err(|e| OverprintError::config(format!("preview: {e}")))?;
        self.export
            .validate()
            .map_err(|e| OverprintError::config(format!("export: {e}")))?;
        for family in self.fonts.keys() {
            if !ALLOWED_FONT_FAMILIES.contains(&family.as_str()) {
                return Err(OverprintError::config(format!(
                    "fonts: '{family}' is not one of {ALLOWED_FONT_FAMILIES:?}"
                )));
            }
        }
        if !ALLOWED_FONT_FAMILIES.contains(&self.defaults.font_family.as_str()) {
            return Err(OverprintError::config(format!(
                "defaults.fontFamily '{}' is not allowed",
                self.defaults.font_family
            )));
        }
        if !self.defaults.font_size.is_finite() || self.defaults.font_size <= 0.0 {
            return Err(OverprintError::config("defaults.fontSize must be > 0"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(OverprintError::config("server.maxBodyBytes must be > 0"));
        }
        if self.server.overlay_max_px == 0 {
            return Err(OverprintError::config("server.overlayMaxPx must be > 0"));
        }
        if !self.server.text_offset_y.is_finite() {
            return Err(OverprintError::config("server.textOffsetY must be finite"));
        }
        Ok(())
    }

    /// Load every configured font file.
    pub fn font_library(&self) -> OverprintResult<FontLibrary> {
        FontLibrary::from_files(&self.fonts, Path::new("."))
    }

    /// Resolver for overlay images rooted at `assets_root`.
    pub fn asset_resolver(&self) -> AssetResolver {
        AssetResolver::new(self.assets_root.clone())
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> OverprintResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| OverprintError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
