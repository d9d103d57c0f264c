//! Composite persistence: write one finished canvas as a PNG file.
//!
//! PNG is lossless — rendered text stays crisp, which is the whole point of
//! page composites. Writes are atomic (encode to memory, write a temp file,
//! rename) so an interrupted run never leaves a truncated PNG behind; the
//! file handle is scoped to the write and released before the rename.

use crate::error::PdftileError;
use image::RgbImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `image` to `dir/{label}.png` atomically and return the final path.
///
/// The caller owns directory creation; this function only writes files.
pub async fn save_composite(
    dir: &Path,
    label: &str,
    image: &RgbImage,
) -> Result<PathBuf, PdftileError> {
    let path = dir.join(format!("{label}.png"));

    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PdftileError::PngEncodeFailed {
            label: label.to_string(),
            detail: e.to_string(),
        })?;
    debug!("Encoded {} → {} bytes PNG", label, buf.len());

    let tmp_path = path.with_extension("png.tmp");
    tokio::fs::write(&tmp_path, &buf)
        .await
        .map_err(|e| PdftileError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| PdftileError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    Ok(path)
}
