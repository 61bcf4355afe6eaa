//! Message-link parsing and scan-bound validation.

use crate::error::ConfigError;
use crate::scan::types::ScanBounds;

/// Extract the message id from a message link ("Copy Message Link"
/// style URL) or a bare id. The last path segment must be a numeric
/// snowflake.
pub fn parse_message_id(link: &str) -> Option<String> {
    let trimmed = link.trim().trim_end_matches('/');
    let last = trimmed.rsplit('/').next()?;
    last.parse::<u64>().ok().map(|id| id.to_string())
}

/// Build validated scan bounds from optional start/end message links.
/// When both markers are given the start must be strictly older
/// (smaller snowflake) than the end.
pub fn bounds_from_links(
    start_link: Option<&str>,
    end_link: Option<&str>,
) -> Result<ScanBounds, ConfigError> {
    let start = parse_link(start_link)?;
    let end = parse_link(end_link)?;

    if let (Some(start_id), Some(end_id)) = (snowflake(&start), snowflake(&end))
        && start_id >= end_id
    {
        return Err(ConfigError::StartNotBeforeEnd);
    }

    Ok(ScanBounds { start, end })
}

fn parse_link(link: Option<&str>) -> Result<Option<String>, ConfigError> {
    match link {
        None => Ok(None),
        Some(link) => parse_message_id(link)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidMessageLink { link: link.into() }),
    }
}

fn snowflake(id: &Option<String>) -> Option<u64> {
    id.as_deref().and_then(|id| id.parse().ok())
}
