//! Cross-reaction detection.
//!
//! A "cross" on a submission vetoes that submission (not its author).
//! Custom emoji names are matched by case-insensitive substring
//! containment, which is intentionally permissive: an emoji named just
//! "x" counts as a cross.

use crate::scan::types::{Reaction, ReactionEmoji};

/// Unicode symbols that count as a cross.
const UNICODE_CROSSES: [&str; 4] = ["❌", "❎", "✖", "✕"];

/// Name fragments that mark a custom emoji as a cross.
const CROSS_NAME_MARKERS: [&str; 5] = ["cross", "x", "reject", "wrong", "fail"];

/// Whether a single reaction is a cross. A reaction nobody actually
/// added (count 0) never matches.
pub fn is_cross_reaction(reaction: &Reaction) -> bool {
    if reaction.count == 0 {
        return false;
    }
    match &reaction.emoji {
        ReactionEmoji::Unicode(symbol) => UNICODE_CROSSES.contains(&symbol.as_str()),
        ReactionEmoji::Custom(name) => {
            let name = name.to_lowercase();
            CROSS_NAME_MARKERS.iter().any(|marker| name.contains(marker))
        }
    }
}

/// Whether any reaction in the set is a cross.
pub fn has_cross_reaction(reactions: &[Reaction]) -> bool {
    reactions.iter().any(is_cross_reaction)
}
