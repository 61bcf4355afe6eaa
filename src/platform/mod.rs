//! Chat-platform collaborator seams.
//!
//! The scan engine only ever talks to the platform through these
//! traits. `discord` provides the REST-backed implementation; tests
//! supply in-memory ones.

pub mod discord;
pub mod link;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::{AssignError, SourceError};
use crate::scan::types::{Message, ScanBounds};

pub use discord::{DiscordRest, DiscordRoleAssigner};

/// Lazy, forward-only, chronological message stream. Errors after the
/// first yielded message surface as stream items.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<Message, SourceError>> + Send>>;

/// What to scan: a text channel or a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanTarget {
    Channel(String),
    Thread(String),
}

impl ScanTarget {
    /// The channel id behind the target (threads are channels on the
    /// wire).
    pub fn channel_id(&self) -> &str {
        match self {
            Self::Channel(id) | Self::Thread(id) => id,
        }
    }
}

/// Bounded message history for a channel or thread.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Open a chronological (oldest→newest) stream over the target's
    /// messages. Implementations may use the bounds to limit fetching,
    /// but the extractor enforces them regardless. Fails with
    /// [`SourceError::Unavailable`] when the target is inaccessible.
    async fn fetch(&self, target: &ScanTarget, bounds: &ScanBounds)
    -> Result<MessageStream, SourceError>;
}

/// Role membership checks and mutation.
#[async_trait]
pub trait RoleMutator: Send + Sync {
    /// Whether the author already holds the target role.
    async fn has_role(&self, author_id: &str) -> Result<bool, AssignError>;

    /// Grant the target role to the author.
    async fn assign(&self, author_id: &str) -> Result<(), AssignError>;
}

/// Thread activation. Archived threads must be woken before their
/// history can be scanned.
#[async_trait]
pub trait ThreadUnarchiver: Send + Sync {
    /// Unarchive the thread if needed. Idempotent.
    async fn ensure_active(&self, thread_id: &str) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_exposes_channel_id() {
        assert_eq!(ScanTarget::Channel("123".into()).channel_id(), "123");
        assert_eq!(ScanTarget::Thread("456".into()).channel_id(), "456");
    }
}
