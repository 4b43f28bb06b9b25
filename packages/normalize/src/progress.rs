//! Progress hooks for batch normalization and the per-year runner.
//!
//! Library code reports through [`ProgressCallback`] and never renders
//! anything itself. The CLI passes terminal bars; tables and tests pass
//! [`NullProgress`].

/// Receives progress updates from a batch pass.
pub trait ProgressCallback: Send + Sync {
    /// Announces how many items the pass will handle.
    fn set_total(&self, total: u64);

    /// Records `delta` more items handled.
    fn inc(&self, delta: u64);

    /// Names the item currently being handled (e.g. a snapshot year).
    fn set_message(&self, msg: String);

    /// Ends the pass with a summary line.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
