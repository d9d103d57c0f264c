//! Progress-callback trait for per-group conversion events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the driver composes each group. Groups are processed strictly in
//! sequence, so unlike a concurrent pipeline the events arrive in order —
//! the trait is still `Send + Sync` because the conversion entry points may
//! be driven from any tokio worker thread.

use std::sync::Arc;

/// Called by the driver as it works through the page groups.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait RunProgressCallback: Send + Sync {
    /// Called once after rasterisation, before the first group is composed.
    ///
    /// # Arguments
    /// * `total_groups` — number of output images the run will produce
    fn on_run_start(&self, total_groups: usize) {
        let _ = total_groups;
    }

    /// Called just before a group is composed.
    ///
    /// # Arguments
    /// * `group_num`    — 1-indexed group number
    /// * `total_groups` — total groups in the run
    fn on_group_start(&self, group_num: usize, total_groups: usize) {
        let _ = (group_num, total_groups);
    }

    /// Called when a group's composite has been produced (and, for
    /// directory runs, written to disk).
    ///
    /// # Arguments
    /// * `group_num`    — 1-indexed group number
    /// * `total_groups` — total groups
    /// * `label`        — output label, e.g. `pages_1-4`
    /// * `width`/`height` — composite dimensions in pixels
    fn on_group_complete(
        &self,
        group_num: usize,
        total_groups: usize,
        label: &str,
        width: u32,
        height: u32,
    ) {
        let _ = (group_num, total_groups, label, width, height);
    }

    /// Called once after every group has been composed.
    fn on_run_complete(&self, total_groups: usize) {
        let _ = total_groups;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
