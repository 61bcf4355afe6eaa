//! End-to-end scan flows over in-memory platform collaborators.
//!
//! Each test wires a `ScanEngine` against stub implementations of the
//! platform traits and checks the full pipeline: extraction bounds,
//! aggregation, paced assignment, and the final report.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream;

use role_scan::assign::{NoProgress, Progress};
use role_scan::config::ScanConfig;
use role_scan::error::{AssignError, Error, SourceError};
use role_scan::platform::{MessageSource, MessageStream, RoleMutator, ScanTarget};
use role_scan::scan::types::{
    Attachment, AttachmentFilter, AttachmentKind, Message, Reaction, ReactionEmoji, ScanBounds,
};
use role_scan::scan::{ScanEngine, ScanRequest};

// ── Stub collaborators ──────────────────────────────────────────────

struct InMemorySource {
    messages: Vec<Message>,
}

#[async_trait]
impl MessageSource for InMemorySource {
    async fn fetch(
        &self,
        _target: &ScanTarget,
        _bounds: &ScanBounds,
    ) -> Result<MessageStream, SourceError> {
        Ok(Box::pin(stream::iter(
            self.messages.clone().into_iter().map(Ok),
        )))
    }
}

struct DeadSource;

#[async_trait]
impl MessageSource for DeadSource {
    async fn fetch(
        &self,
        target: &ScanTarget,
        _bounds: &ScanBounds,
    ) -> Result<MessageStream, SourceError> {
        Err(SourceError::Unavailable {
            target: target.channel_id().into(),
            reason: "missing access".into(),
        })
    }
}

/// Mutator whose holder set persists across scans.
#[derive(Default)]
struct SharedMutator {
    holders: Mutex<HashSet<String>>,
    failures: HashMap<String, AssignError>,
}

impl SharedMutator {
    fn failing(author_id: &str, error: AssignError) -> Self {
        let mut failures = HashMap::new();
        failures.insert(author_id.to_string(), error);
        Self {
            holders: Mutex::new(HashSet::new()),
            failures,
        }
    }
}

#[async_trait]
impl RoleMutator for SharedMutator {
    async fn has_role(&self, author_id: &str) -> Result<bool, AssignError> {
        Ok(self.holders.lock().unwrap().contains(author_id))
    }

    async fn assign(&self, author_id: &str) -> Result<(), AssignError> {
        if let Some(error) = self.failures.get(author_id) {
            return Err(error.clone());
        }
        self.holders.lock().unwrap().insert(author_id.into());
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn make_message(id: &str, author_id: &str) -> Message {
    Message {
        id: id.into(),
        author_id: author_id.into(),
        author_is_bot: false,
        content: String::new(),
        attachments: vec![],
        reactions: vec![],
        sent_at: Utc::now(),
    }
}

fn crossed(mut message: Message) -> Message {
    message.reactions.push(Reaction {
        emoji: ReactionEmoji::Unicode("❌".into()),
        count: 1,
    });
    message
}

fn with_image(mut message: Message) -> Message {
    message.attachments.push(Attachment {
        kind: AttachmentKind::Image,
    });
    message
}

fn engine(source: Arc<dyn MessageSource>, mutator: Arc<dyn RoleMutator>) -> ScanEngine {
    ScanEngine::new(
        source,
        mutator,
        ScanConfig {
            assign_delay: Duration::ZERO,
        },
    )
}

fn channel_request(filter: AttachmentFilter) -> ScanRequest {
    ScanRequest {
        target: ScanTarget::Channel("c1".into()),
        bounds: ScanBounds::unbounded(),
        filter,
    }
}

// ── Flows ───────────────────────────────────────────────────────────

#[tokio::test]
async fn clean_duplicate_and_crossed_authors_tally_correctly() {
    // Author A posts clean, author B posts crossed, author A posts a
    // crossed duplicate. A stays eligible; B is excluded.
    let source = Arc::new(InMemorySource {
        messages: vec![
            make_message("1", "a"),
            crossed(make_message("2", "b")),
            crossed(make_message("3", "a")),
        ],
    });
    let mutator = Arc::new(SharedMutator::default());
    let engine = engine(source, mutator);

    let report = engine
        .run(&channel_request(AttachmentFilter::None), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.total_authors_scanned, 2);
    assert_eq!(report.assigned_count, 1);
    assert_eq!(report.cross_skipped_count, 1);
    assert_eq!(report.duplicate_submitter_count, 1);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn image_filter_excludes_bare_messages_regardless_of_reactions() {
    let source = Arc::new(InMemorySource {
        messages: vec![
            make_message("1", "a"),
            with_image(make_message("2", "b")),
        ],
    });
    let mutator = Arc::new(SharedMutator::default());
    let engine = engine(source, mutator);

    let report = engine
        .run(&channel_request(AttachmentFilter::Image), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.total_authors_scanned, 2);
    assert_eq!(report.filter_skipped_count, 1);
    assert_eq!(report.assigned_count, 1);
}

#[tokio::test]
async fn rate_limited_failure_is_recorded_and_scan_continues() {
    let source = Arc::new(InMemorySource {
        messages: vec![make_message("1", "c"), make_message("2", "d")],
    });
    let mutator = Arc::new(SharedMutator::failing("c", AssignError::RateLimited));
    let engine = engine(source, mutator);

    let report = engine
        .run(&channel_request(AttachmentFilter::None), &NoProgress)
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].author_id, "c");
    assert_eq!(report.failures[0].reason, AssignError::RateLimited);
    // The scan continued past the failure.
    assert_eq!(report.assigned_count, 1);
}

#[tokio::test]
async fn unavailable_source_aborts_the_scan() {
    let engine = engine(Arc::new(DeadSource), Arc::new(SharedMutator::default()));

    let result = engine
        .run(&channel_request(AttachmentFilter::None), &NoProgress)
        .await;

    assert!(matches!(result, Err(Error::Source(_))));
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let source = Arc::new(InMemorySource {
        messages: vec![make_message("1", "a"), make_message("2", "b")],
    });
    let mutator = Arc::new(SharedMutator::default());
    let engine = engine(source, Arc::clone(&mutator) as Arc<dyn RoleMutator>);
    let request = channel_request(AttachmentFilter::None);

    let first = engine.run(&request, &NoProgress).await.unwrap();
    assert_eq!(first.assigned_count, 2);
    assert_eq!(first.already_had_count, 0);

    let second = engine.run(&request, &NoProgress).await.unwrap();
    assert_eq!(second.assigned_count, 0);
    assert_eq!(second.already_had_count, 2);
}

#[tokio::test]
async fn report_buckets_partition_all_authors() {
    let source = Arc::new(InMemorySource {
        messages: vec![
            with_image(make_message("1", "a")), // eligible
            crossed(with_image(make_message("2", "b"))), // cross skipped
            make_message("3", "c"),            // filter skipped (no image)
            with_image(make_message("4", "d")), // eligible
        ],
    });
    let mutator = Arc::new(SharedMutator::default());
    let engine = engine(source, mutator);

    let report = engine
        .run(&channel_request(AttachmentFilter::Image), &NoProgress)
        .await
        .unwrap();

    assert_eq!(
        report.assigned_count
            + report.already_had_count
            + report.cross_skipped_count
            + report.filter_skipped_count,
        report.total_authors_scanned
    );
}

#[tokio::test]
async fn bounds_are_honored_end_to_end() {
    let source = Arc::new(InMemorySource {
        messages: vec![
            make_message("1", "a"),
            make_message("2", "b"),
            make_message("3", "c"),
            make_message("4", "d"),
        ],
    });
    let mutator = Arc::new(SharedMutator::default());
    let engine = engine(source, mutator);

    let request = ScanRequest {
        target: ScanTarget::Channel("c1".into()),
        bounds: ScanBounds {
            start: Some("2".into()),
            end: Some("3".into()),
        },
        filter: AttachmentFilter::None,
    };
    let report = engine.run(&request, &NoProgress).await.unwrap();

    // Only b and c fall inside the markers.
    assert_eq!(report.total_authors_scanned, 2);
    assert_eq!(report.assigned_count, 2);
}

#[tokio::test]
async fn progress_counts_every_eligible_author() {
    let source = Arc::new(InMemorySource {
        messages: vec![
            make_message("1", "a"),
            crossed(make_message("2", "b")),
            make_message("3", "c"),
        ],
    });
    let mutator = Arc::new(SharedMutator::default());
    let engine = engine(source, mutator);

    let seen = Mutex::new(Vec::new());
    let sink = |p: Progress| seen.lock().unwrap().push((p.processed, p.total));
    engine
        .run(&channel_request(AttachmentFilter::None), &sink)
        .await
        .unwrap();

    // b is cross-skipped, so only two eligible authors are counted.
    assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
}
