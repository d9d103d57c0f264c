//! # pdftile
//!
//! Convert PDF documents into PNG images, one page at a time or several
//! pages composited onto a single canvas.
//!
//! ## Why this crate?
//!
//! Slide decks, sheet music, and reference documents are often easier to
//! consume as a handful of tiled images than as a PDF: two pages side by
//! side for a spread, four pages in a 2x2 grid for an overview wall. This
//! crate rasterises each page via pdfium and deterministically composites
//! consecutive pages onto white canvases — no overlap, no cropping, short
//! final groups padded with blank cells in grid mode.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Render   rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Compose  partition pages into groups, blit each group onto a canvas
//!  └─ 4. Save     one PNG per group (page_3.png, pages_5-8.png, …)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftile::{convert_to_dir, Layout, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder().layout(Layout::Grid).build()?;
//!     let output = convert_to_dir("document.pdf", "output/document_grid", &config).await?;
//!     for f in &output.files {
//!         println!("{} ({}x{})", f.path.display(), f.width, f.height);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Layout modes
//!
//! | Mode | Pages per image | Canvas |
//! |------|-----------------|--------|
//! | `single` | 1 | the page itself, unchanged |
//! | `horizontal` | 2 | `(w1+w2, max(h1,h2))`, pages left to right |
//! | `vertical` | 2 | `(max(w1,w2), h1+h2)`, pages top to bottom |
//! | `grid` | 4 | `(2*w0, 2*h0)`, 2x2, short groups padded white |
//!
//! A trailing odd page in strip mode is emitted as-is, unpadded. Grid mode
//! always emits a full 2x2 canvas, sized by the group's first page.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftile` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdftile = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PageSelection, RunConfig, RunConfigBuilder};
pub use convert::{convert, convert_from_bytes, convert_sync, convert_to_dir, inspect};
pub use error::PdftileError;
pub use layout::Layout;
pub use output::{
    Composite, ConversionOutput, ConversionStats, DirOutput, DocumentMetadata, SavedComposite,
};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
