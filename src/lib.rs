//! Overprint is a deterministic image compositing engine.
//!
//! A [`Scene`] describes one composition: a background color, an ordered list of raster
//! [`Overlay`]s (optionally clipped to a circle), and a styled [`TextBlock`] painted above
//! everything. Rendering is split in two phases:
//!
//! - [`prepare`] validates the scene and decodes every overlay image into a [`ResolvedScene`]
//! - [`Renderer::render`] paints the resolved scene onto a fresh [`Surface`] without any IO
//!
//! Surfaces are exported with [`encode_png`] / [`to_data_url`]. On top of the engine sit an
//! interactive [`EditorSession`] and the `POST /api/generate` HTTP endpoint
//! ([`GenerateService`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod export;
mod foundation;
mod logging;
mod prepare;
mod render;
mod scene;
mod server;
mod session;

pub use crate::foundation::core::{Canvas, MAX_CANVAS_EDGE, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{OverprintError, OverprintResult};

pub use crate::assets::decode::{PreparedImage, decode_image, parse_data_uri};
pub use crate::assets::fonts::{FontFace, FontLibrary};
pub use crate::assets::source::{AssetResolver, ImageLoader, normalize_rel_path};
pub use crate::config::{LoggingConfig, OverprintConfig, RequestDefaults, ServerConfig};
pub use crate::export::png::{DOWNLOAD_FILENAME, encode_png, to_data_url, write_download};
pub use crate::logging::init_logging;
pub use crate::prepare::resolve::{
    DecodePolicy, ResolvedOverlay, ResolvedScene, SkippedOverlay, prepare,
};
pub use crate::render::pipeline::Renderer;
pub use crate::render::surface::Surface;
pub use crate::scene::color::Color;
pub use crate::scene::fingerprint::{SceneFingerprint, fingerprint_scene};
pub use crate::scene::model::{
    ALLOWED_FONT_FAMILIES, ImageSource, MAX_TEXT_SIZE_PX, Overlay, OverlayShape, Scene, Shadow,
    TextAlign, TextAnchor, TextBaseline, TextBlock,
};
pub use crate::server::http::{GENERATE_PATH, GenerateService, HttpReply, serve};
pub use crate::server::request::{GenerateRequest, image_reference};
pub use crate::session::editor::{
    EditorSession, MAX_FONT_SIZE, MIN_FONT_SIZE, OverlayPatch, default_scene,
};
