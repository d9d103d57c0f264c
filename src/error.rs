//! Error types for the pdftile library.
//!
//! Every error here is **fatal**: the run cannot produce its remaining
//! outputs and the top-level `convert*` functions return `Err(PdftileError)`.
//! Files already written to the output directory are left in place — there is
//! no rollback, callers can inspect or delete partial output themselves.
//!
//! Constituent pages that differ in size within one group are deliberately
//! NOT an error. The grid composer derives all cell geometry from the first
//! image of the group and clips any excess, so a mismatch is logged as a
//! `tracing` warning and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdftile library.
#[derive(Debug, Error)]
pub enum PdftileError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Compositor errors ─────────────────────────────────────────────────
    /// A composer was invoked with zero constituent images.
    ///
    /// This indicates a bug in the group-partitioning driver: a correctly
    /// partitioned run never produces an empty group, and without at least
    /// one real image there is no cell size to derive blank padding from.
    #[error("Compositor invoked with an empty page group (start index {start})\nThis is a bug — please report it.")]
    EmptyGroup { start: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not encode a composite image as PNG.
    #[error("Failed to encode composite '{label}' as PNG: {detail}")]
    PngEncodeFailed { label: String, detail: String },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, or install it system-wide.\n\
Prebuilt libraries: https://github.com/bblanchon/pdfium-binaries\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
