//! Output types: composites, run statistics, document metadata.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One finished output image, still in memory.
///
/// Produced by [`crate::convert::convert`]; `label` follows the naming
/// contract `page_{n}` (single mode) / `pages_{first}-{last}` (composite
/// modes) and is safe to use as a file stem.
#[derive(Debug, Clone)]
pub struct Composite {
    /// Filename-safe label, without extension.
    pub label: String,
    /// 1-indexed number of the first constituent page.
    pub first_page: usize,
    /// 1-indexed number of the last constituent page (inclusive).
    pub last_page: usize,
    /// The composed pixels: RGB, white background.
    pub image: RgbImage,
}

/// Result of an in-memory conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// One entry per group, in page order.
    pub composites: Vec<Composite>,
    /// Document metadata extracted before rendering.
    pub metadata: DocumentMetadata,
    /// Timing and page counters for the run.
    pub stats: ConversionStats,
}

/// One output file written by [`crate::convert::convert_to_dir`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedComposite {
    /// Label the file was named after (`{label}.png`).
    pub label: String,
    /// Absolute or caller-relative path of the written PNG.
    pub path: PathBuf,
    /// 1-indexed first constituent page.
    pub first_page: usize,
    /// 1-indexed last constituent page (inclusive).
    pub last_page: usize,
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
}

/// Result of a conversion that wrote PNG files to a directory.
///
/// Serialisable as-is; this is what the CLI prints for `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirOutput {
    /// Output files in the order they were written.
    pub files: Vec<SavedComposite>,
    /// Document metadata extracted before rendering.
    pub metadata: DocumentMetadata,
    /// Timing and page counters for the run.
    pub stats: ConversionStats,
}

/// Counters and wall-clock timings for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Page count of the source document.
    pub total_pages: usize,
    /// Pages actually rasterised (after page selection).
    pub rendered_pages: usize,
    /// Output images produced.
    pub composite_count: usize,
    /// Time spent rasterising pages.
    pub render_duration_ms: u64,
    /// Time spent compositing (and, for directory runs, writing PNGs).
    pub compose_duration_ms: u64,
    /// End-to-end run time.
    pub total_duration_ms: u64,
}

/// Document metadata extracted from the PDF without rendering pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Total pages in the document.
    pub page_count: usize,
    /// PDF specification version, e.g. "Pdf1_7".
    pub pdf_version: String,
    pub is_encrypted: bool,
}
