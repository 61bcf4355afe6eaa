//! Submission extraction — a bounded, classified view of the raw
//! message stream.
//!
//! Wraps the source's chronological message stream with two optional
//! gates (skip until the start marker, stop after the end marker, both
//! inclusive), drops bot authors, and classifies every surviving
//! message into a [`SubmissionVerdict`]. Nothing is buffered: large
//! channels are never materialized in memory.

use futures::{Stream, StreamExt, stream};

use crate::error::SourceError;
use crate::scan::types::{AttachmentFilter, Message, ScanBounds, SubmissionVerdict};
use crate::scan::{attachment, reaction};

/// Bound gate state carried across the stream.
struct Gate {
    /// Still looking for the start marker.
    skipping: bool,
    start: Option<String>,
    end: Option<String>,
    /// End marker was yielded; the source is not polled again.
    done: bool,
}

/// Classify one in-range message.
fn classify(message: &Message, filter: AttachmentFilter) -> SubmissionVerdict {
    SubmissionVerdict {
        message_id: message.id.clone(),
        author_id: message.author_id.clone(),
        has_cross_reaction: reaction::has_cross_reaction(&message.reactions),
        passes_attachment_filter: attachment::passes_filter(message, filter),
    }
}

/// Lazily turn a chronological message stream into a verdict stream,
/// honoring the scan bounds. Source errors pass through as items; the
/// consumer treats the first one as fatal.
pub fn verdicts<S>(
    source: S,
    bounds: ScanBounds,
    filter: AttachmentFilter,
) -> impl Stream<Item = Result<SubmissionVerdict, SourceError>>
where
    S: Stream<Item = Result<Message, SourceError>>,
{
    let gate = Gate {
        skipping: bounds.start.is_some(),
        start: bounds.start,
        end: bounds.end,
        done: false,
    };

    stream::unfold((Box::pin(source), gate), move |(mut source, mut gate)| async move {
        loop {
            if gate.done {
                return None;
            }
            match source.next().await {
                None => return None,
                Some(Err(e)) => return Some((Err(e), (source, gate))),
                Some(Ok(message)) => {
                    if gate.skipping {
                        if gate.start.as_deref() == Some(message.id.as_str()) {
                            gate.skipping = false;
                        } else {
                            continue;
                        }
                    }
                    if gate.end.as_deref() == Some(message.id.as_str()) {
                        gate.done = true;
                    }
                    if message.author_is_bot {
                        // An end marker on a bot message still stops the scan.
                        if gate.done {
                            return None;
                        }
                        continue;
                    }
                    return Some((Ok(classify(&message, filter)), (source, gate)));
                }
            }
        }
    })
}
