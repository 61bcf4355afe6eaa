//! Per-author aggregation of submission verdicts.
//!
//! One clean submission is enough: an author with any submission that
//! passed the attachment filter and carried no cross reaction is
//! eligible, no matter how many crossed duplicates they also posted.

use std::collections::HashMap;

use futures::{Stream, StreamExt, pin_mut};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::scan::types::SubmissionVerdict;

/// Aggregated decision for one distinct author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorOutcome {
    pub author_id: String,
    /// How many in-range submissions this author posted.
    pub submission_count: u32,
    /// At least one submission passed the filter and had no cross.
    /// Set-once: never cleared by later crossed duplicates.
    pub any_clean_submission: bool,
    /// Every submission by this author failed the attachment filter.
    /// Starts true, flips false on the first passing submission.
    pub filtered_out: bool,
}

impl AuthorOutcome {
    fn new(author_id: String) -> Self {
        Self {
            author_id,
            submission_count: 0,
            any_clean_submission: false,
            filtered_out: true,
        }
    }

    /// Eligible for role assignment.
    pub fn is_eligible(&self) -> bool {
        !self.filtered_out && self.any_clean_submission
    }

    /// Excluded because every remaining submission carried a cross.
    pub fn is_cross_skipped(&self) -> bool {
        !self.filtered_out && !self.any_clean_submission
    }
}

/// Streaming fold of verdicts into per-author outcomes, preserving
/// first-seen author order.
#[derive(Debug, Default)]
pub struct Aggregator {
    index: HashMap<String, usize>,
    outcomes: Vec<AuthorOutcome>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one verdict into its author's outcome.
    pub fn observe(&mut self, verdict: &SubmissionVerdict) {
        let idx = match self.index.get(&verdict.author_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.outcomes.len();
                self.outcomes
                    .push(AuthorOutcome::new(verdict.author_id.clone()));
                self.index.insert(verdict.author_id.clone(), idx);
                idx
            }
        };

        let outcome = &mut self.outcomes[idx];
        outcome.submission_count += 1;
        if verdict.passes_attachment_filter {
            outcome.filtered_out = false;
            if !verdict.has_cross_reaction {
                outcome.any_clean_submission = true;
            }
        }
    }

    /// Finish the fold, yielding outcomes in first-seen author order.
    pub fn into_outcomes(self) -> Vec<AuthorOutcome> {
        self.outcomes
    }
}

/// Drain a verdict stream into outcomes. The first source error aborts
/// the whole scan; partial aggregation state is discarded with it.
pub async fn collect<S>(verdicts: S) -> Result<Vec<AuthorOutcome>, SourceError>
where
    S: Stream<Item = Result<SubmissionVerdict, SourceError>>,
{
    let mut aggregator = Aggregator::new();
    pin_mut!(verdicts);
    while let Some(verdict) = verdicts.next().await {
        aggregator.observe(&verdict?);
    }
    Ok(aggregator.into_outcomes())
}
