use std::path::{Path, PathBuf};

use crate::{
    assets::decode::{PreparedImage, decode_image, parse_data_uri},
    foundation::error::{OverprintError, OverprintResult},
    scene::model::ImageSource,
};

/// Turns an [`ImageSource`] into a decoded image.
///
/// This is the only place overlay IO happens; renderers only ever see [`PreparedImage`]s.
pub trait ImageLoader {
    /// Resolve and decode one image source.
    fn load(&self, source: &ImageSource) -> OverprintResult<PreparedImage>;
}

/// Default loader: data URIs, paths under a root directory, and (with the `remote-images`
/// feature) http(s) URLs.
#[derive(Clone, Debug)]
pub struct AssetResolver {
    root: PathBuf,
    max_bytes: usize,
}

impl AssetResolver {
    /// Default cap on encoded image size.
    pub const DEFAULT_MAX_BYTES: usize = 32 * 1024 * 1024;

    /// Resolver rooted at `root` for relative paths.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }

    /// Override the maximum accepted encoded size.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Root directory for relative paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fetch the encoded bytes behind a source (no decoding).
    pub fn read_bytes(&self, source: &ImageSource) -> OverprintResult<Vec<u8>> {
        let bytes = match source {
            ImageSource::DataUri(uri) => parse_data_uri(uri)?.1,
            ImageSource::Path(rel) => {
                let norm = normalize_rel_path(rel)?;
                let p = self.root.join(Path::new(&norm));
                std::fs::read(&p).map_err(|e| {
                    OverprintError::decode(format!("failed to read image '{}': {e}", p.display()))
                })?
            }
            ImageSource::Url(url) => fetch_url(url, self.max_bytes)?,
            ImageSource::Decoded(_) => {
                return Err(OverprintError::decode(
                    "decoded image source has no encoded bytes",
                ));
            }
        };
        if bytes.len() > self.max_bytes {
            return Err(OverprintError::decode(format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                self.max_bytes
            )));
        }
        Ok(bytes)
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ImageLoader for AssetResolver {
    fn load(&self, source: &ImageSource) -> OverprintResult<PreparedImage> {
        if let ImageSource::Decoded(img) = source {
            img.check_drawable()?;
            return Ok(img.clone());
        }
        let bytes = self.read_bytes(source)?;
        decode_image(&bytes)
    }
}

/// Normalize a relative asset path, rejecting absolute paths and `..` components.
pub fn normalize_rel_path(source: &str) -> OverprintResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(OverprintError::decode("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(OverprintError::decode("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(OverprintError::decode("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(OverprintError::decode("image path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(feature = "remote-images")]
fn fetch_url(url: &str, max_bytes: usize) -> OverprintResult<Vec<u8>> {
    use std::io::Read as _;

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(OverprintError::decode(format!(
            "unsupported url scheme in '{url}'"
        )));
    }
    tracing::debug!(url, "fetching overlay image");
    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| OverprintError::decode(format!("fetch '{url}': {e}")))?;
    let mut bytes = Vec::new();
    resp.take(max_bytes as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| OverprintError::decode(format!("read '{url}': {e}")))?;
    Ok(bytes)
}

#[cfg(not(feature = "remote-images"))]
fn fetch_url(url: &str, _max_bytes: usize) -> OverprintResult<Vec<u8>> {
    Err(OverprintError::decode(format!(
        "cannot fetch '{url}': built without the `remote-images` feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
