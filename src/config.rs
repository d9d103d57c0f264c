//! Run configuration for a PDF-to-images conversion.
//!
//! All behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`] and passed by reference into the driver. The config
//! is constructed once at startup and never mutated afterwards — layout /
//! pages-per-image reconciliation happens in the pure
//! [`Layout::normalize_pages_per_image`](crate::layout::Layout::normalize_pages_per_image)
//! function before the config is built, not by patching a config in place.

use crate::error::PdftileError;
use crate::layout::Layout;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for one conversion run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use pdftile::{Layout, RunConfig};
///
/// let config = RunConfig::builder()
///     .layout(Layout::Grid)
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.group_size(), 4);
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Page arrangement in each output image. Default: [`Layout::Single`].
    pub layout: Layout,

    /// Rendering DPI used when rasterising each PDF page. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps text legible in composites while the files stay small.
    /// Increase for small-font documents; decrease for poster-sized pages.
    pub dpi: u32,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 4000.
    ///
    /// A safety cap independent of DPI. A 300-DPI render of an A0 poster
    /// would produce a 10 000 × 14 000 px page — and grid mode allocates a
    /// canvas four times that. This caps either dimension, scaling the other
    /// proportionally, so memory stays bounded on oversized pages.
    pub max_rendered_pixels: u32,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-group progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            dpi: 150,
            max_rendered_pixels: 4000,
            pages: PageSelection::default(),
            password: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("layout", &self.layout)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }

    /// Pages composited into each output image, derived from the layout.
    pub fn group_size(&self) -> usize {
        self.layout.pages_per_group()
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn layout(mut self, layout: Layout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, PdftileError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(PdftileError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start > end {
                return Err(PdftileError::InvalidConfig(format!(
                    "Page range start {start} is after end {end}"
                )));
            }
        }
        Ok(self.config)
    }
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// page numbers, clipped to `total_pages`.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
