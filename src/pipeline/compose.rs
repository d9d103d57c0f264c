//! Layout compositing: blit a group of rendered pages onto one canvas.
//!
//! All composers take the group as a slice of borrowed [`RgbImage`]s and
//! return a freshly allocated canvas; source pages are never modified. Canvas
//! pixels not covered by a pasted page are white.
//!
//! ## The first-image-defines-the-grid rule
//!
//! Grid mode derives the cell size for *all four* cells from the first
//! constituent, rather than computing per-row/per-column maxima. Pages of one
//! PDF rendered at a fixed DPI share a size in practice, and a single
//! authoritative cell size keeps every grid composite exactly
//! `(2*w0, 2*h0)` — blank padding is derived from it too. A later page that
//! differs in size is pasted anyway and clipped at the canvas edge; the
//! mismatch is logged as a warning, never an error.

use crate::error::PdftileError;
use image::{imageops, Rgb, RgbImage};
use tracing::{debug, warn};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// An all-white filler image, used to pad short grid groups.
pub fn blank_filler(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Combine pages side by side, left to right.
///
/// Canvas is `(Σ widths, max height)`. A single-page group is returned as a
/// direct copy — no canvas, no padding — so a trailing odd page keeps its
/// own dimensions.
pub fn horizontal_strip(pages: &[&RgbImage]) -> Result<RgbImage, PdftileError> {
    match pages {
        [] => Err(PdftileError::EmptyGroup { start: 0 }),
        [only] => Ok((*only).clone()),
        _ => {
            let width: u32 = pages.iter().map(|p| p.width()).sum();
            let height: u32 = pages.iter().map(|p| p.height()).max().unwrap_or(0);
            debug!("Horizontal strip: {} pages → {}x{}", pages.len(), width, height);

            let mut canvas = RgbImage::from_pixel(width, height, WHITE);
            let mut x: i64 = 0;
            for page in pages {
                imageops::replace(&mut canvas, *page, x, 0);
                x += i64::from(page.width());
            }
            Ok(canvas)
        }
    }
}

/// Combine pages stacked, top to bottom.
///
/// Canvas is `(max width, Σ heights)`; otherwise symmetric with
/// [`horizontal_strip`], including the single-page copy case.
pub fn vertical_strip(pages: &[&RgbImage]) -> Result<RgbImage, PdftileError> {
    match pages {
        [] => Err(PdftileError::EmptyGroup { start: 0 }),
        [only] => Ok((*only).clone()),
        _ => {
            let width: u32 = pages.iter().map(|p| p.width()).max().unwrap_or(0);
            let height: u32 = pages.iter().map(|p| p.height()).sum();
            debug!("Vertical strip: {} pages → {}x{}", pages.len(), width, height);

            let mut canvas = RgbImage::from_pixel(width, height, WHITE);
            let mut y: i64 = 0;
            for page in pages {
                imageops::replace(&mut canvas, *page, 0, y);
                y += i64::from(page.height());
            }
            Ok(canvas)
        }
    }
}

/// Combine 1–4 pages into a 2x2 grid.
///
/// Groups shorter than four are padded with white fillers sized to the first
/// real page, so every grid composite is a full `(2*w0, 2*h0)` canvas.
/// Placement order: top-left, top-right, bottom-left, bottom-right.
pub fn grid_2x2(pages: &[&RgbImage]) -> Result<RgbImage, PdftileError> {
    let first = pages.first().ok_or(PdftileError::EmptyGroup { start: 0 })?;
    let (cell_w, cell_h) = first.dimensions();

    for (i, page) in pages.iter().enumerate().skip(1) {
        if page.dimensions() != (cell_w, cell_h) {
            warn!(
                "Grid constituent {} is {}x{}, cell is {}x{}; excess will be clipped",
                i + 1,
                page.width(),
                page.height(),
                cell_w,
                cell_h
            );
        }
    }

    let filler = blank_filler(cell_w, cell_h);
    debug!(
        "Grid 2x2: {} real page(s), {} filler(s), cell {}x{}",
        pages.len().min(4),
        4usize.saturating_sub(pages.len()),
        cell_w,
        cell_h
    );

    let mut canvas = RgbImage::from_pixel(2 * cell_w, 2 * cell_h, WHITE);
    let cells = pages
        .iter()
        .copied()
        .chain(std::iter::repeat(&filler))
        .take(4);
    for (i, cell) in cells.enumerate() {
        let x = (i % 2) as i64 * i64::from(cell_w);
        let y = (i / 2) as i64 * i64::from(cell_h);
        imageops::replace(&mut canvas, cell, x, y);
    }
    Ok(canvas)
}
