//! Role assignment: paced mutation loop and progress reporting.

pub mod driver;
pub mod progress;

pub use driver::{AssignmentDriver, MutationResult, MutationStatus};
pub use progress::{NoProgress, Progress, ProgressSink};
