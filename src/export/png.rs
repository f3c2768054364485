use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    foundation::error::{OverprintError, OverprintResult},
    render::surface::Surface,
};

/// File name used for downloads.
pub const DOWNLOAD_FILENAME: &str = "generated-image.png";

/// Encode a surface as PNG (straight alpha, default compression and filter).
///
/// Preview, download, and server output all go through this one function.
pub fn encode_png(surface: &Surface) -> OverprintResult<Vec<u8>> {
    let rgba = surface.to_straight_rgba8();
    let mut buf = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut buf),
        &rgba,
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| OverprintError::encode(format!("png: {e}")))?;
    Ok(buf)
}

/// Encode a surface as a `data:image/png;base64,...` URL.
pub fn to_data_url(surface: &Surface) -> OverprintResult<String> {
    let png = encode_png(surface)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// Write the PNG as [`DOWNLOAD_FILENAME`] inside `dir`, creating `dir` if needed.
pub fn write_download(surface: &Surface, dir: &Path) -> OverprintResult<PathBuf> {
    let png = encode_png(surface)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create download dir '{}'", dir.display()))?;
    let path = dir.join(DOWNLOAD_FILENAME);
    std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "wrote download");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
