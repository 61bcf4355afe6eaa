//! Configuration types.

use std::time::Duration;

/// Scan engine configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Pause after every role mutation attempt. Paces the platform's
    /// rate limit; applies on success and failure alike.
    pub assign_delay: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            assign_delay: Duration::from_millis(300),
        }
    }
}
