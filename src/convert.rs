//! Conversion entry points and the group-partitioning driver.
//!
//! Both entry points share the same preparation (resolve input → read
//! metadata → rasterise every selected page into memory) and then walk the
//! page groups strictly in sequence. [`convert`] collects every composite
//! into memory; [`convert_to_dir`] writes each composite to disk as soon as
//! it is composed and drops the pixels, which keeps peak memory at one
//! canvas beyond the page set even for long documents.

use crate::config::RunConfig;
use crate::error::PdftileError;
use crate::layout::{self, Layout, PageGroup};
use crate::output::{
    Composite, ConversionOutput, ConversionStats, DirOutput, DocumentMetadata, SavedComposite,
};
use crate::pipeline::{compose, input, render, save};
use image::RgbImage;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file or URL into composite images, kept in memory.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config`    — Run configuration
///
/// # Errors
/// Any failure is fatal and aborts the run: unreadable input, corrupt or
/// password-protected PDF, rasterisation failure, or an empty page group
/// (a driver bug).
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &RunConfig,
) -> Result<ConversionOutput, PdftileError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    let doc = open_and_render(input_str, config).await?;
    let groups = layout::partition(doc.pages.len(), config.group_size());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(groups.len());
    }

    let compose_start = Instant::now();
    let mut composites = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_group_start(i + 1, groups.len());
        }
        let composite = compose_group(config.layout, group, &doc.pages)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_group_complete(
                i + 1,
                groups.len(),
                &composite.label,
                composite.image.width(),
                composite.image.height(),
            );
        }
        composites.push(composite);
    }
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(groups.len());
    }

    let stats = ConversionStats {
        total_pages: doc.metadata.page_count,
        rendered_pages: doc.pages.len(),
        composite_count: composites.len(),
        render_duration_ms: doc.render_duration_ms,
        compose_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} composite(s) in {}ms",
        stats.composite_count, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        composites,
        metadata: doc.metadata,
        stats,
    })
}

/// Convert a PDF and write one `{label}.png` per group into `output_dir`.
///
/// The directory is created if missing. Composites are written group by
/// group; on error, files already written stay on disk (no rollback).
pub async fn convert_to_dir(
    input_str: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<DirOutput, PdftileError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    let output_dir = output_dir.as_ref();
    info!(
        "Starting conversion: {} → {}",
        input_str,
        output_dir.display()
    );

    let doc = open_and_render(input_str, config).await?;
    let groups = layout::partition(doc.pages.len(), config.group_size());

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| PdftileError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(groups.len());
    }

    let compose_start = Instant::now();
    let mut files = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_group_start(i + 1, groups.len());
        }
        let composite = compose_group(config.layout, group, &doc.pages)?;
        let path = save::save_composite(output_dir, &composite.label, &composite.image).await?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_group_complete(
                i + 1,
                groups.len(),
                &composite.label,
                composite.image.width(),
                composite.image.height(),
            );
        }
        files.push(SavedComposite {
            label: composite.label,
            path,
            first_page: composite.first_page,
            last_page: composite.last_page,
            width: composite.image.width(),
            height: composite.image.height(),
        });
    }
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(groups.len());
    }

    let stats = ConversionStats {
        total_pages: doc.metadata.page_count,
        rendered_pages: doc.pages.len(),
        composite_count: files.len(),
        render_duration_ms: doc.render_duration_ms,
        compose_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Wrote {} file(s) to {} in {}ms",
        stats.composite_count,
        output_dir.display(),
        stats.total_duration_ms
    );

    Ok(DirOutput {
        files,
        metadata: doc.metadata,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &RunConfig,
) -> Result<ConversionOutput, PdftileError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PdftileError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_str, config))
}

/// Extract PDF metadata without rendering or compositing anything.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, PdftileError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    let pdf_path = resolved.path().to_path_buf();
    render::extract_metadata(&pdf_path, None).await
}

/// Convert PDF bytes in memory.
///
/// pdfium needs a file-system path, so the bytes are written to a managed
/// [`tempfile`] that is cleaned up automatically on return or panic. Use
/// this when PDF data comes from a database or network stream rather than a
/// file on disk.
pub async fn convert_from_bytes(
    bytes: &[u8],
    config: &RunConfig,
) -> Result<ConversionOutput, PdftileError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| PdftileError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PdftileError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(&path, config).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Everything the driver needs after the I/O-heavy preparation steps.
struct RenderedDocument {
    metadata: DocumentMetadata,
    /// `(page_index_0based, pixels)` in page order.
    pages: Vec<(usize, RgbImage)>,
    render_duration_ms: u64,
}

/// Resolve the input, read metadata, and rasterise every selected page.
async fn open_and_render(
    input_str: &str,
    config: &RunConfig,
) -> Result<RenderedDocument, PdftileError> {
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    let metadata = render::extract_metadata(&pdf_path, config.password.as_deref()).await?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(PdftileError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    debug!("Selected {} pages", page_indices.len());

    let render_start = Instant::now();
    let pages = render::render_pages(&pdf_path, config, &page_indices).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!("Rendered {} pages in {}ms", pages.len(), render_duration_ms);

    Ok(RenderedDocument {
        metadata,
        pages,
        render_duration_ms,
    })
}

/// Compose one group into its labelled output image.
///
/// Single mode bypasses composition entirely: the page's pixels are the
/// output, with no padding and no offset computation.
fn compose_group(
    layout: Layout,
    group: &PageGroup,
    pages: &[(usize, RgbImage)],
) -> Result<Composite, PdftileError> {
    if group.count == 0 || group.start + group.count > pages.len() {
        return Err(PdftileError::EmptyGroup { start: group.start });
    }
    let slice = &pages[group.start..group.start + group.count];
    let first_page = slice[0].0 + 1;
    let last_page = slice[slice.len() - 1].0 + 1;

    let refs: Vec<&RgbImage> = slice.iter().map(|(_, img)| img).collect();
    let image = match layout {
        Layout::Single => slice[0].1.clone(),
        Layout::Horizontal => compose::horizontal_strip(&refs)?,
        Layout::Vertical => compose::vertical_strip(&refs)?,
        Layout::Grid => compose::grid_2x2(&refs)?,
    };
    let label = match layout {
        Layout::Single => layout::page_label(first_page),
        _ => layout::group_label(first_page, last_page),
    };

    Ok(Composite {
        label,
        first_page,
        last_page,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn page(idx: usize, w: u32, h: u32, rgb: [u8; 3]) -> (usize, RgbImage) {
        (idx, RgbImage::from_pixel(w, h, Rgb(rgb)))
    }

    #[test]
    fn single_mode_bypasses_composition() {
        let pages = vec![page(0, 10, 12, [1, 1, 1]), page(1, 10, 12, [2, 2, 2])];
        let group = PageGroup { start: 1, count: 1 };

        let c = compose_group(Layout::Single, &group, &pages).unwrap();
        assert_eq!(c.label, "page_2");
        assert_eq!(c.first_page, 2);
        assert_eq!(c.last_page, 2);
        assert_eq!(c.image, pages[1].1);
    }

    #[test]
    fn horizontal_group_label_spans_pages() {
        let pages = vec![page(0, 10, 12, [1, 1, 1]), page(1, 14, 12, [2, 2, 2])];
        let group = PageGroup { start: 0, count: 2 };

        let c = compose_group(Layout::Horizontal, &group, &pages).unwrap();
        assert_eq!(c.label, "pages_1-2");
        assert_eq!(c.image.dimensions(), (24, 12));
    }

    #[test]
    fn grid_trailing_group_pads_to_full_canvas() {
        // 5-page document: second grid group holds only page 5.
        let pages: Vec<_> = (0..5).map(|i| page(i, 10, 12, [i as u8; 3])).collect();
        let group = PageGroup { start: 4, count: 1 };

        let c = compose_group(Layout::Grid, &group, &pages).unwrap();
        assert_eq!(c.label, "pages_5-5");
        assert_eq!(c.image.dimensions(), (20, 24));
    }

    #[test]
    fn labels_follow_original_page_numbers_under_selection() {
        // Pages 3 and 5 selected (0-based 2 and 4): the label spans 3-5.
        let pages = vec![page(2, 10, 12, [3, 3, 3]), page(4, 10, 12, [5, 5, 5])];
        let group = PageGroup { start: 0, count: 2 };

        let c = compose_group(Layout::Vertical, &group, &pages).unwrap();
        assert_eq!(c.label, "pages_3-5");
    }

    #[test]
    fn out_of_range_group_is_an_empty_group_error() {
        let pages = vec![page(0, 10, 12, [0, 0, 0])];
        let group = PageGroup { start: 4, count: 4 };

        let err = compose_group(Layout::Grid, &group, &pages).unwrap_err();
        assert!(matches!(err, PdftileError::EmptyGroup { start: 4 }));
    }
}
