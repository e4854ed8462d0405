//! Caption sidecar files: `name.ext` gets `name.txt` next to it.

use std::path::{Path, PathBuf};

/// Path of the caption file for an image: same folder and stem, `.txt`.
pub fn sidecar_path(image: &Path) -> PathBuf {
    image.with_extension("txt")
}

/// Create or overwrite the sidecar for `image` with exactly `caption`.
///
/// The file is closed before this returns. Returns the sidecar path.
pub fn write_caption(image: &Path, caption: &str) -> std::io::Result<PathBuf> {
    let path = sidecar_path(image);
    std::fs::write(&path, caption.as_bytes())?;
    Ok(path)
}
