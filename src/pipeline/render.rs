//! PDF rasterisation: render selected pages to `RgbImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a dedicated
//! thread designed for blocking operations, so the Tokio worker threads do
//! not stall during CPU-heavy rendering.
//!
//! ## DPI and the pixel cap
//!
//! Target width is derived from the page's physical width in points
//! (`points × dpi / 72`) and then clamped by `max_rendered_pixels` on either
//! dimension. Page sizes vary wildly — an A0 poster at 300 DPI would be a
//! 10,000 px wide bitmap, and grid mode allocates a canvas four times the
//! page area — so the cap keeps memory bounded regardless of physical size.

use crate::config::RunConfig;
use crate::error::PdftileError;
use crate::output::DocumentMetadata;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rasterise the selected pages of a PDF into RGB images.
///
/// Pages are rendered strictly in order, one at a time, and the whole
/// sequence is returned before any compositing starts.
///
/// # Returns
/// A vector of `(page_index_0based, RgbImage)` tuples, in page order.
pub async fn render_pages(
    pdf_path: &Path,
    config: &RunConfig,
    page_indices: &[usize],
) -> Result<Vec<(usize, RgbImage)>, PdftileError> {
    let path = pdf_path.to_path_buf();
    let dpi = config.dpi;
    let max_pixels = config.max_rendered_pixels;
    let password = config.password.clone();
    let indices = page_indices.to_vec();

    tokio::task::spawn_blocking(move || {
        render_pages_blocking(&path, dpi, max_pixels, password.as_deref(), &indices)
    })
    .await
    .map_err(|e| PdftileError::Internal(format!("Render task panicked: {e}")))?
}

/// Bind to a pdfium library: a copy next to the executable wins, then the
/// system-wide installation.
fn bind_pdfium() -> Result<Pdfium, PdftileError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| PdftileError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Load a document, mapping pdfium's password failures onto our error kinds.
fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdftileError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{e:?}");
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdftileError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdftileError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdftileError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Blocking implementation of page rendering.
fn render_pages_blocking(
    pdf_path: &Path,
    dpi: u32,
    max_pixels: u32,
    password: Option<&str>,
    page_indices: &[usize],
) -> Result<Vec<(usize, RgbImage)>, PdftileError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut results = Vec::with_capacity(page_indices.len());

    for &idx in page_indices {
        if idx >= total_pages {
            return Err(PdftileError::PageOutOfRange {
                page: idx + 1,
                total: total_pages,
            });
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| PdftileError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        // points × dpi / 72 = pixels; capped on both axes.
        let target_width = (page.width().value * dpi as f32 / 72.0).round() as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width.min(max_pixels as i32))
            .set_maximum_height(max_pixels as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdftileError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            }
        })?;

        let image = bitmap.as_image().into_rgb8();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));
    }

    Ok(results)
}

/// Extract document metadata from a PDF without rendering pages.
pub async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, PdftileError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(|s| s.to_string());

    tokio::task::spawn_blocking(move || extract_metadata_blocking(&path, pwd.as_deref()))
        .await
        .map_err(|e| PdftileError::Internal(format!("Metadata task panicked: {e}")))?
}

/// Blocking implementation of metadata extraction.
fn extract_metadata_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, PdftileError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();
    let pages = document.pages();

    let tag = |t: PdfDocumentMetadataTagType| -> Option<String> {
        metadata
            .get(t)
            .map(|t| t.value().to_string())
            .filter(|v| !v.is_empty())
    };

    Ok(DocumentMetadata {
        title: tag(PdfDocumentMetadataTagType::Title),
        author: tag(PdfDocumentMetadataTagType::Author),
        subject: tag(PdfDocumentMetadataTagType::Subject),
        creator: tag(PdfDocumentMetadataTagType::Creator),
        producer: tag(PdfDocumentMetadataTagType::Producer),
        creation_date: tag(PdfDocumentMetadataTagType::CreationDate),
        modification_date: tag(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
        is_encrypted: false, // pdfium doesn't readily expose this after opening
    })
}
