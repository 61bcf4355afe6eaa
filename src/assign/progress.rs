//! Live progress reporting for the assignment loop.
//!
//! The driver pushes updates into a sink owned by the caller; there is
//! no shared module state to reset between scans.

/// Monotonic progress counter: authors processed out of total eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

/// Receives a progress update after every processed eligible author.
pub trait ProgressSink: Send + Sync {
    fn update(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn update(&self, progress: Progress) {
        self(progress)
    }
}

/// Sink that drops every update.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _progress: Progress) {}
}
