//! Layout modes and group partitioning.
//!
//! Everything in this module is pure arithmetic on page counts and indices —
//! no pixels, no I/O. The driver in [`crate::convert`] maps each
//! [`PageGroup`] produced here onto a slice of rendered pages and hands that
//! slice to the matching composer in [`crate::pipeline::compose`].
//!
//! # Partitioning contract
//!
//! For a document with `T` rendered pages and a group size `G`, `partition`
//! produces exactly `ceil(T / G)` groups. Group `i` starts at `i * G` and
//! holds `min(G, T - start)` pages, so the concatenation of all groups covers
//! `[0, T)` exactly once and only the final group may be short.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How pages are arranged in each output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One page per output image, no compositing. (default)
    #[default]
    Single,
    /// Two pages side by side, left to right.
    Horizontal,
    /// Two pages stacked, top to bottom.
    Vertical,
    /// Four pages in a 2x2 grid; short final groups are padded with
    /// blank white cells.
    Grid,
}

impl Layout {
    /// Number of pages composited into each output image for this mode.
    pub fn pages_per_group(self) -> usize {
        match self {
            Layout::Single => 1,
            Layout::Horizontal | Layout::Vertical => 2,
            Layout::Grid => 4,
        }
    }

    /// Reconcile a user-requested pages-per-image value with this mode.
    ///
    /// Each layout supports exactly one group size (single ⇒ 1,
    /// horizontal/vertical ⇒ 2, grid ⇒ 4). A mismatched request is not an
    /// error: the mode's own size wins and a warning message is returned for
    /// the CLI to surface. Returns `(effective_size, Option<warning>)`.
    pub fn normalize_pages_per_image(self, requested: Option<usize>) -> (usize, Option<String>) {
        let expected = self.pages_per_group();
        match requested {
            Some(n) if n != expected => (
                expected,
                Some(format!(
                    "{self} layout uses {expected} page(s) per image; ignoring requested value {n}"
                )),
            ),
            _ => (expected, None),
        }
    }

    /// Lowercase mode name, as accepted by the CLI and used in output
    /// directory names.
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::Horizontal => "horizontal",
            Layout::Vertical => "vertical",
            Layout::Grid => "grid",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contiguous slice `[start, start + count)` of the rendered page
/// sequence, destined for a single output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGroup {
    /// 0-based offset into the rendered page sequence.
    pub start: usize,
    /// Number of real pages in the group; equals the group size except
    /// possibly for the final group.
    pub count: usize,
}

/// Split `total` pages into consecutive groups of `group_size`.
///
/// Returns `ceil(total / group_size)` groups; the final group is short when
/// `total` is not a multiple of `group_size`. An empty page sequence (or a
/// zero group size, which a validated config never produces) yields no
/// groups.
pub fn partition(total: usize, group_size: usize) -> Vec<PageGroup> {
    if total == 0 || group_size == 0 {
        return Vec::new();
    }
    (0..total.div_ceil(group_size))
        .map(|i| {
            let start = i * group_size;
            PageGroup {
                start,
                count: group_size.min(total - start),
            }
        })
        .collect()
}

/// Filename-safe label for a single-page output, e.g. `page_3`.
///
/// `page` is the 1-indexed page number shown to users.
pub fn page_label(page: usize) -> String {
    format!("page_{page}")
}

/// Filename-safe label for a composite output, e.g. `pages_5-8`.
///
/// `first` and `last` are the 1-indexed page numbers of the group's first
/// and last constituents (inclusive).
pub fn group_label(first: usize, last: usize) -> String {
    format!("pages_{first}-{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_per_group_mapping() {
        assert_eq!(Layout::Single.pages_per_group(), 1);
        assert_eq!(Layout::Horizontal.pages_per_group(), 2);
        assert_eq!(Layout::Vertical.pages_per_group(), 2);
        assert_eq!(Layout::Grid.pages_per_group(), 4);
    }

    #[test]
    fn normalize_accepts_matching_or_absent_request() {
        assert_eq!(Layout::Grid.normalize_pages_per_image(None), (4, None));
        assert_eq!(Layout::Grid.normalize_pages_per_image(Some(4)), (4, None));
        assert_eq!(Layout::Single.normalize_pages_per_image(None), (1, None));
    }

    #[test]
    fn normalize_overrides_mismatch_with_warning() {
        let (n, warning) = Layout::Horizontal.normalize_pages_per_image(Some(4));
        assert_eq!(n, 2);
        let warning = warning.expect("mismatch should warn");
        assert!(warning.contains("horizontal"), "got: {warning}");
        assert!(warning.contains('4'));
    }

    #[test]
    fn partition_exact_multiple() {
        let groups = partition(8, 4);
        assert_eq!(
            groups,
            vec![
                PageGroup { start: 0, count: 4 },
                PageGroup { start: 4, count: 4 },
            ]
        );
    }

    #[test]
    fn partition_trailing_short_group() {
        let groups = partition(5, 4);
        assert_eq!(
            groups,
            vec![
                PageGroup { start: 0, count: 4 },
                PageGroup { start: 4, count: 1 },
            ]
        );
    }

    #[test]
    fn partition_group_count_is_ceil() {
        for total in 0..40 {
            for group_size in 1..=5 {
                let groups = partition(total, group_size);
                assert_eq!(
                    groups.len(),
                    total.div_ceil(group_size),
                    "total={total} group_size={group_size}"
                );
            }
        }
    }

    #[test]
    fn partition_covers_every_index_exactly_once() {
        for total in 0..40 {
            for group_size in 1..=5 {
                let covered: Vec<usize> = partition(total, group_size)
                    .iter()
                    .flat_map(|g| g.start..g.start + g.count)
                    .collect();
                let expected: Vec<usize> = (0..total).collect();
                assert_eq!(covered, expected, "total={total} group_size={group_size}");
            }
        }
    }

    #[test]
    fn partition_empty_inputs() {
        assert!(partition(0, 4).is_empty());
        assert!(partition(5, 0).is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(page_label(1), "page_1");
        assert_eq!(page_label(12), "page_12");
        assert_eq!(group_label(1, 4), "pages_1-4");
        assert_eq!(group_label(5, 5), "pages_5-5");
    }
}
