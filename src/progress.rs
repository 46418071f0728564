// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape/export).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One fund page was fetched and processed (complete or suppressed).
    fn item_done(&mut self, _fund: &str) {}

    /// One fund page could not be fetched.
    fn item_failed(&mut self, _fund: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
