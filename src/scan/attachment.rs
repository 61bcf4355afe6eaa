//! Attachment filter checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::scan::types::{AttachmentFilter, AttachmentKind, Message};

/// URL detection for the link filter.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Whether a message passes the given attachment filter. Pure function
/// of the message and the mode; a message with no attachments simply
/// fails the image filter, it is not an error.
pub fn passes_filter(message: &Message, filter: AttachmentFilter) -> bool {
    match filter {
        AttachmentFilter::None => true,
        AttachmentFilter::Image => message
            .attachments
            .iter()
            .any(|a| a.kind == AttachmentKind::Image),
        AttachmentFilter::Link => {
            URL_REGEX.is_match(&message.content)
                || message
                    .attachments
                    .iter()
                    .any(|a| a.kind == AttachmentKind::Link)
        }
    }
}
