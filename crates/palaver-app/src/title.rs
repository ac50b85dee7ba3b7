//! Derived conversation titles.
//!
//! Untitled conversations (direct chats) show the comma-joined display
//! names of the other participants, truncated past [`MAX_TITLE_CHARS`].

use palaver_core::{User, UserId};

/// Longest derived title shown untruncated.
const MAX_TITLE_CHARS: usize = 30;
/// Characters kept before the ellipsis when truncating.
const TRUNCATED_CHARS: usize = 27;

/// Comma-joined display names of all participants except `current_user`,
/// truncated to 27 chars plus `...` when the joined string exceeds 30.
pub fn participant_title(users: &[User], current_user: &UserId) -> String {
    let names = users
        .iter()
        .filter(|u| &u.id != current_user)
        .map(|u| u.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if names.chars().count() > MAX_TITLE_CHARS {
        let mut truncated: String = names.chars().take(TRUNCATED_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        names
    }
}
