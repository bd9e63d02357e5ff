// src/progress.rs
/// Lightweight progress reporting used by long-running operations (league scrape, downloads).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (e.g., a team file was written).
    fn item_done(&mut self, _id: &str) {}

    /// Called when one logical unit fails; the run carries on.
    fn item_failed(&mut self, _id: &str, _err: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
