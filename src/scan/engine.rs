//! Scan engine — wires the pipeline end to end.
//!
//! Flow: fetch bounded history → classify into verdicts → fold into
//! per-author outcomes → paced role assignment → report. One scan is
//! one sequential pipeline; two concurrent scans share nothing.

use std::sync::Arc;

use tracing::info;

use crate::assign::{AssignmentDriver, ProgressSink};
use crate::config::ScanConfig;
use crate::error::Result;
use crate::platform::{MessageSource, RoleMutator, ScanTarget, ThreadUnarchiver};
use crate::report::{self, Report};
use crate::scan::types::{AttachmentFilter, ScanBounds};
use crate::scan::{aggregate, extract};

/// One scan invocation: where to look and how to filter.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub target: ScanTarget,
    pub bounds: ScanBounds,
    pub filter: AttachmentFilter,
}

/// Submission scan & role-assignment engine.
///
/// Owns no platform state beyond its collaborator handles; every call
/// to [`ScanEngine::run`] builds its own aggregation from scratch.
pub struct ScanEngine {
    source: Arc<dyn MessageSource>,
    mutator: Arc<dyn RoleMutator>,
    unarchiver: Option<Arc<dyn ThreadUnarchiver>>,
    config: ScanConfig,
}

impl ScanEngine {
    pub fn new(
        source: Arc<dyn MessageSource>,
        mutator: Arc<dyn RoleMutator>,
        config: ScanConfig,
    ) -> Self {
        Self {
            source,
            mutator,
            unarchiver: None,
            config,
        }
    }

    /// Attach a thread unarchiver, invoked once before any thread scan.
    pub fn with_unarchiver(mut self, unarchiver: Arc<dyn ThreadUnarchiver>) -> Self {
        self.unarchiver = Some(unarchiver);
        self
    }

    /// Run one full scan. A source failure aborts before any report is
    /// built; mutation failures are folded into the report instead.
    pub async fn run(
        &self,
        request: &ScanRequest,
        progress: &dyn ProgressSink,
    ) -> Result<Report> {
        info!(
            target = ?request.target,
            filter = request.filter.label(),
            "Starting submission scan"
        );

        if let ScanTarget::Thread(thread_id) = &request.target
            && let Some(unarchiver) = &self.unarchiver
        {
            unarchiver.ensure_active(thread_id).await?;
        }

        let messages = self
            .source
            .fetch(&request.target, &request.bounds)
            .await?;
        let verdicts = extract::verdicts(messages, request.bounds.clone(), request.filter);
        let outcomes = aggregate::collect(verdicts).await?;

        info!(authors = outcomes.len(), "Aggregation complete");

        let driver = AssignmentDriver::new(self.mutator.as_ref(), self.config.assign_delay);
        let results = driver.run(&outcomes, progress).await;

        Ok(report::build(request.filter, &outcomes, &results))
    }
}
