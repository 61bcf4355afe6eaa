//! Shared types for the submission scan pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Attachment filter ───────────────────────────────────────────────

/// Which submissions qualify for the role, by attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentFilter {
    /// No filter — every submission qualifies.
    #[default]
    None,
    /// Only submissions carrying an image attachment.
    Image,
    /// Only submissions carrying a URL (in the body or as a link embed).
    Link,
}

impl AttachmentFilter {
    /// Human-readable label for the report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None (everyone)",
            Self::Image => "Image only",
            Self::Link => "URL/link only",
        }
    }
}

// ── Message model ───────────────────────────────────────────────────

/// Broad attachment category. Platform bindings fold MIME types and
/// embed types into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// `image/*` content type.
    Image,
    /// URL-typed embed.
    Link,
    /// Anything else (video, file, unknown).
    Other,
}

/// A single attachment on a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
}

/// The emoji behind a reaction. Custom guild emojis match by name,
/// unicode emojis by literal symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionEmoji {
    Unicode(String),
    Custom(String),
}

/// One reaction row on a message: the emoji and how many users added it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: ReactionEmoji,
    pub count: u64,
}

/// A chat message as seen by the scan. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Platform message id (snowflake).
    pub id: String,
    /// Platform user id of the author.
    pub author_id: String,
    /// Bot accounts never count as submitters.
    pub author_is_bot: bool,
    /// Message body text.
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub reactions: Vec<Reaction>,
    /// When the message was sent.
    pub sent_at: DateTime<Utc>,
}

// ── Scan bounds ─────────────────────────────────────────────────────

/// Optional start/end message markers, both inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanBounds {
    /// Messages strictly before this id are skipped.
    pub start: Option<String>,
    /// The scan stops after this message.
    pub end: Option<String>,
}

impl ScanBounds {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

// ── Verdict ─────────────────────────────────────────────────────────

/// Per-message classification result. Produced once per scanned
/// message; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionVerdict {
    pub message_id: String,
    pub author_id: String,
    pub has_cross_reaction: bool,
    pub passes_attachment_filter: bool,
}
