//! Scan report: deterministic tally plus plain-text rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assign::{MutationResult, MutationStatus};
use crate::error::AssignError;
use crate::scan::aggregate::AuthorOutcome;
use crate::scan::types::AttachmentFilter;

/// How many failure lines the rendered summary shows before truncating.
const MAX_FAILURES_SHOWN: usize = 20;

/// One per-author assignment failure, in driver order.
#[derive(Debug, Clone, Serialize)]
pub struct AssignFailure {
    pub author_id: String,
    pub reason: AssignError,
}

/// Final scan tally. Derived once from outcomes and mutation results;
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub attachment_filter: AttachmentFilter,
    pub total_authors_scanned: usize,
    pub assigned_count: usize,
    pub already_had_count: usize,
    pub cross_skipped_count: usize,
    pub filter_skipped_count: usize,
    pub duplicate_submitter_count: usize,
    pub failures: Vec<AssignFailure>,
    pub completed_at: DateTime<Utc>,
}

/// Reduce outcomes and mutation results into the report.
pub fn build(
    attachment_filter: AttachmentFilter,
    outcomes: &[AuthorOutcome],
    results: &[MutationResult],
) -> Report {
    let mut assigned_count = 0;
    let mut already_had_count = 0;
    let mut failures = Vec::new();

    for result in results {
        match &result.status {
            MutationStatus::Assigned => assigned_count += 1,
            MutationStatus::AlreadyHad => already_had_count += 1,
            MutationStatus::Failed(reason) => failures.push(AssignFailure {
                author_id: result.author_id.clone(),
                reason: reason.clone(),
            }),
        }
    }

    Report {
        attachment_filter,
        total_authors_scanned: outcomes.len(),
        assigned_count,
        already_had_count,
        cross_skipped_count: outcomes.iter().filter(|o| o.is_cross_skipped()).count(),
        filter_skipped_count: outcomes.iter().filter(|o| o.filtered_out).count(),
        duplicate_submitter_count: outcomes.iter().filter(|o| o.submission_count > 1).count(),
        failures,
        completed_at: Utc::now(),
    }
}

/// Render the report as the summary text shown to the operator.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::with_capacity(512);

    out.push_str("✅ Scan complete\n\n");
    out.push_str(&format!(
        "Attachment filter: {}\n",
        report.attachment_filter.label()
    ));
    out.push_str(&format!(
        "Total authors scanned: {}\n",
        report.total_authors_scanned
    ));
    out.push_str(&format!("New roles assigned: {}\n", report.assigned_count));
    out.push_str(&format!("Already had role: {}\n", report.already_had_count));
    out.push_str(&format!(
        "Skipped (cross reaction): {}\n",
        report.cross_skipped_count
    ));
    out.push_str(&format!(
        "Skipped (attachment filter): {}\n",
        report.filter_skipped_count
    ));
    out.push_str(&format!(
        "Duplicate submitters: {}\n",
        report.duplicate_submitter_count
    ));
    out.push_str(&format!("Failed to assign: {}\n", report.failures.len()));

    if !report.failures.is_empty() {
        out.push_str("\nFailed assignments:\n");
        for failure in report.failures.iter().take(MAX_FAILURES_SHOWN) {
            out.push_str(&format!("  • {} ({})\n", failure.author_id, failure.reason));
        }
        if report.failures.len() > MAX_FAILURES_SHOWN {
            out.push_str(&format!(
                "  ... and {} more.\n",
                report.failures.len() - MAX_FAILURES_SHOWN
            ));
        }
    }

    out
}
