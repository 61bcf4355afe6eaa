//! Submission scan pipeline.

pub mod aggregate;
pub mod attachment;
pub mod engine;
pub mod extract;
pub mod reaction;
pub mod types;

pub use engine::{ScanEngine, ScanRequest};
