//! Assignment driver — walks aggregated outcomes and applies the role.
//!
//! One mutation at a time, in first-seen author order, with a fixed
//! pacing delay after every mutation attempt. Failures are classified
//! and recorded; they never stop the walk.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assign::progress::{Progress, ProgressSink};
use crate::error::AssignError;
use crate::platform::RoleMutator;
use crate::scan::aggregate::AuthorOutcome;

/// What happened to one eligible author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    Assigned,
    AlreadyHad,
    Failed(AssignError),
}

/// Mutation record for one eligible author.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResult {
    pub author_id: String,
    pub status: MutationStatus,
}

/// Paced role-mutation loop over aggregated outcomes.
pub struct AssignmentDriver<'a> {
    mutator: &'a dyn RoleMutator,
    delay: Duration,
}

impl<'a> AssignmentDriver<'a> {
    pub fn new(mutator: &'a dyn RoleMutator, delay: Duration) -> Self {
        Self { mutator, delay }
    }

    /// Process every eligible outcome in order. Non-eligible outcomes
    /// (filtered out, or all submissions crossed) produce no result;
    /// the report builder counts them from the outcomes directly.
    ///
    /// The pacing delay runs after every `assign` call, success or
    /// failure. No delay when no mutation call was made (author already
    /// had the role, or the membership check itself failed).
    pub async fn run(
        &self,
        outcomes: &[AuthorOutcome],
        progress: &dyn ProgressSink,
    ) -> Vec<MutationResult> {
        let total = outcomes.iter().filter(|o| o.is_eligible()).count();
        info!(eligible = total, "Starting role assignment");

        let mut results = Vec::with_capacity(total);
        let mut processed = 0;

        for outcome in outcomes.iter().filter(|o| o.is_eligible()) {
            let (status, paced) = match self.mutator.has_role(&outcome.author_id).await {
                Ok(true) => {
                    debug!(author = %outcome.author_id, "Author already has the role");
                    (MutationStatus::AlreadyHad, false)
                }
                Ok(false) => match self.mutator.assign(&outcome.author_id).await {
                    Ok(()) => {
                        info!(author = %outcome.author_id, "Role assigned");
                        (MutationStatus::Assigned, true)
                    }
                    Err(e) => {
                        warn!(author = %outcome.author_id, error = %e, "Role assignment failed");
                        (MutationStatus::Failed(e), true)
                    }
                },
                Err(e) => {
                    warn!(author = %outcome.author_id, error = %e, "Membership check failed");
                    (MutationStatus::Failed(e), false)
                }
            };

            results.push(MutationResult {
                author_id: outcome.author_id.clone(),
                status,
            });
            processed += 1;
            progress.update(Progress { processed, total });

            if paced {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            processed = results.len(),
            "Role assignment pass complete"
        );
        results
    }
}
