//! Discord REST binding — message history, role mutation, and thread
//! unarchiving over the HTTP API.
//!
//! History pages arrive newest-first from the API; the source reverses
//! each page so the engine only ever sees chronological order.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AssignError, SourceError};
use crate::platform::{MessageSource, MessageStream, RoleMutator, ScanTarget, ThreadUnarchiver};
use crate::scan::types::{
    Attachment, AttachmentKind, Message, Reaction, ReactionEmoji, ScanBounds,
};

const API_BASE: &str = "https://discord.com/api/v10";

/// Messages per history page (API maximum).
const HISTORY_PAGE_LIMIT: usize = 100;

/// Audit-log reason attached to every role mutation.
const AUDIT_REASON: &str = "Event submission scan";

/// Low-level REST client. Cheap to clone; clones share the connection
/// pool.
#[derive(Clone)]
pub struct DiscordRest {
    token: SecretString,
    client: reqwest::Client,
}

impl DiscordRest {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{API_BASE}/{path}")
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token.expose_secret())
    }

    /// Fetch channel metadata. Doubles as the access probe: a channel
    /// the bot cannot see fails here, before any history is streamed.
    async fn fetch_channel(&self, channel_id: &str) -> Result<WireChannel, SourceError> {
        let resp = self
            .client
            .get(self.api_url(&format!("channels/{channel_id}")))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| SourceError::Unavailable {
                target: channel_id.into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable {
                target: channel_id.into(),
                reason: format!("channel lookup failed (HTTP {status}): {body}"),
            });
        }

        resp.json::<WireChannel>()
            .await
            .map_err(|e| SourceError::Unavailable {
                target: channel_id.into(),
                reason: format!("malformed channel payload: {e}"),
            })
    }

    /// Fetch one history page strictly after the cursor snowflake.
    async fn fetch_history_page(
        &self,
        channel_id: &str,
        after: &str,
    ) -> Result<Vec<WireMessage>, SourceError> {
        let resp = self
            .client
            .get(self.api_url(&format!("channels/{channel_id}/messages")))
            .header("Authorization", self.auth_header())
            .query(&[
                ("limit", HISTORY_PAGE_LIMIT.to_string()),
                ("after", after.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Unavailable {
                target: channel_id.into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable {
                target: channel_id.into(),
                reason: format!("history fetch failed (HTTP {status}): {body}"),
            });
        }

        resp.json::<Vec<WireMessage>>()
            .await
            .map_err(|e| SourceError::Unavailable {
                target: channel_id.into(),
                reason: format!("malformed history payload: {e}"),
            })
    }
}

/// Pagination cursor: one below the start marker so the marker itself
/// is the first fetched message; snowflake 0 when unbounded.
fn initial_cursor(bounds: &ScanBounds) -> String {
    bounds
        .start
        .as_deref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(|id| id.saturating_sub(1).to_string())
        .unwrap_or_else(|| "0".to_string())
}

struct PageState {
    channel_id: String,
    buffer: VecDeque<Message>,
    cursor: String,
    exhausted: bool,
}

#[async_trait]
impl MessageSource for DiscordRest {
    async fn fetch(
        &self,
        target: &ScanTarget,
        bounds: &ScanBounds,
    ) -> Result<MessageStream, SourceError> {
        let channel_id = target.channel_id().to_string();
        self.fetch_channel(&channel_id).await?;

        let rest = self.clone();
        let state = PageState {
            channel_id,
            buffer: VecDeque::new(),
            cursor: initial_cursor(bounds),
            exhausted: false,
        };

        let stream = stream::try_unfold(state, move |mut state| {
            let rest = rest.clone();
            async move {
                loop {
                    if let Some(message) = state.buffer.pop_front() {
                        return Ok(Some((message, state)));
                    }
                    if state.exhausted {
                        return Ok(None);
                    }

                    let mut page = rest
                        .fetch_history_page(&state.channel_id, &state.cursor)
                        .await?;
                    if page.len() < HISTORY_PAGE_LIMIT {
                        state.exhausted = true;
                    }
                    page.reverse();
                    debug!(
                        channel = %state.channel_id,
                        fetched = page.len(),
                        "Fetched history page"
                    );
                    if let Some(newest) = page.last() {
                        state.cursor = newest.id.clone();
                    }
                    state.buffer.extend(page.into_iter().map(Message::from));
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl ThreadUnarchiver for DiscordRest {
    async fn ensure_active(&self, thread_id: &str) -> Result<(), SourceError> {
        let channel = self.fetch_channel(thread_id).await?;
        let archived = channel
            .thread_metadata
            .map(|meta| meta.archived)
            .unwrap_or(false);
        if !archived {
            return Ok(());
        }

        info!(thread = %thread_id, "Unarchiving thread before scan");
        let resp = self
            .client
            .patch(self.api_url(&format!("channels/{thread_id}")))
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "archived": false }))
            .send()
            .await
            .map_err(|e| SourceError::Unavailable {
                target: thread_id.into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable {
                target: thread_id.into(),
                reason: format!("could not unarchive thread (HTTP {status}): {body}"),
            });
        }
        Ok(())
    }
}

// ── Role mutation ───────────────────────────────────────────────────

/// Role mutator scoped to one guild role.
pub struct DiscordRoleAssigner {
    rest: DiscordRest,
    guild_id: String,
    role_id: String,
}

impl DiscordRoleAssigner {
    pub fn new(rest: DiscordRest, guild_id: String, role_id: String) -> Self {
        Self {
            rest,
            guild_id,
            role_id,
        }
    }
}

#[async_trait]
impl RoleMutator for DiscordRoleAssigner {
    async fn has_role(&self, author_id: &str) -> Result<bool, AssignError> {
        let url = self.rest.api_url(&format!(
            "guilds/{}/members/{author_id}",
            self.guild_id
        ));
        let resp = self
            .rest
            .client
            .get(url)
            .header("Authorization", self.rest.auth_header())
            .send()
            .await
            .map_err(|e| AssignError::Unknown(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let member: WireMember = resp
            .json()
            .await
            .map_err(|e| AssignError::Unknown(format!("malformed member payload: {e}")))?;
        Ok(member.roles.iter().any(|role| role == &self.role_id))
    }

    async fn assign(&self, author_id: &str) -> Result<(), AssignError> {
        let url = self.rest.api_url(&format!(
            "guilds/{}/members/{author_id}/roles/{}",
            self.guild_id, self.role_id
        ));
        let resp = self
            .rest
            .client
            .put(url)
            .header("Authorization", self.rest.auth_header())
            .header("X-Audit-Log-Reason", AUDIT_REASON)
            .send()
            .await
            .map_err(|e| AssignError::Unknown(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        Ok(())
    }
}

/// Map a failed mutation response onto the failure taxonomy.
fn classify_status(status: reqwest::StatusCode, body: &str) -> AssignError {
    use reqwest::StatusCode;
    match status {
        StatusCode::FORBIDDEN => AssignError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => AssignError::RateLimited,
        StatusCode::NOT_FOUND => AssignError::NotFound,
        _ => AssignError::Unknown(format!("HTTP {status}: {body}")),
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireChannel {
    #[serde(default)]
    thread_metadata: Option<WireThreadMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireThreadMetadata {
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Deserialize)]
struct WireMember {
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    id: String,
    #[serde(default)]
    content: String,
    author: WireUser,
    #[serde(default)]
    attachments: Vec<WireAttachment>,
    #[serde(default)]
    embeds: Vec<WireEmbed>,
    #[serde(default)]
    reactions: Vec<WireReaction>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    bot: bool,
}

#[derive(Debug, Deserialize)]
struct WireAttachment {
    #[serde(default)]
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireEmbed {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireReaction {
    emoji: WireEmoji,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct WireEmoji {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

fn attachment_kind(content_type: Option<&str>) -> AttachmentKind {
    match content_type {
        Some(ct) if ct.starts_with("image/") => AttachmentKind::Image,
        _ => AttachmentKind::Other,
    }
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        let mut attachments: Vec<Attachment> = wire
            .attachments
            .iter()
            .map(|a| Attachment {
                kind: attachment_kind(a.content_type.as_deref()),
            })
            .collect();
        // Link embeds count as URL-typed attachments for the link filter.
        attachments.extend(
            wire.embeds
                .iter()
                .filter(|e| e.kind.as_deref() == Some("link"))
                .map(|_| Attachment {
                    kind: AttachmentKind::Link,
                }),
        );

        let reactions = wire
            .reactions
            .into_iter()
            .filter_map(|r| {
                let emoji = match (r.emoji.id, r.emoji.name) {
                    // Custom emojis carry an id and match by name.
                    (Some(_), Some(name)) => ReactionEmoji::Custom(name),
                    (None, Some(symbol)) => ReactionEmoji::Unicode(symbol),
                    (_, None) => return None,
                };
                Some(Reaction {
                    emoji,
                    count: r.count,
                })
            })
            .collect();

        Message {
            id: wire.id,
            author_id: wire.author.id,
            author_is_bot: wire.author.bot,
            content: wire.content,
            attachments,
            reactions,
            sent_at: wire.timestamp,
        }
    }
}
