//! Export of base64 image payloads to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use crate::result::ImageItem;

/// Decode one image's bytes.
pub fn decode(image: &ImageItem) -> Result<Vec<u8>> {
    STANDARD
        .decode(image.data.trim())
        .with_context(|| format!("invalid base64 payload for '{}'", image.filename))
}

/// Decode every image into `dir`, returning the written paths.
///
/// Only the final path component of each filename is used, so a payload
/// cannot write outside `dir`. Unnamed images get `image<N>.bin`.
pub fn save_all(images: &[ImageItem], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let name = Path::new(&image.filename)
            .file_name()
            .map_or_else(|| format!("image{}.bin", index + 1), |n| n.to_string_lossy().into_owned());
        let path = dir.join(name);
        let bytes = decode(image)?;
        std::fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Image saved");
        written.push(path);
    }
    Ok(written)
}
