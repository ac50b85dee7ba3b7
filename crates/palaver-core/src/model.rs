//! Chat data model.
//!
//! Records mirror what the remote service returns: conversations, user
//! records, and messages. Views hold them by value and never mutate message
//! identity; the only local mutation a conversation sees is the
//! fire-and-forget activity "touch" after a message send.

use std::fmt;

/// Opaque user identifier assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

/// Opaque conversation identifier assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(String);

/// Opaque message identifier assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

string_id!(UserId);
string_id!(ConversationId);
string_id!(MessageId);

/// A user record resolved from the service directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Service-assigned identifier.
    pub id: UserId,
    /// Human-readable display name.
    pub display_name: String,
}

impl User {
    /// Create a user record.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: UserId::new(id), display_name: display_name.into() }
    }
}

/// A conversation as held by reference in view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Service-assigned identifier.
    pub id: ConversationId,
    /// Explicit title. `None` for direct chats, which derive a title from
    /// participant names.
    pub title: Option<String>,
    /// Participant identifiers, in service order.
    pub participant_ids: Vec<UserId>,
    /// Participant count as reported by the service.
    pub participant_count: usize,
    /// Last-activity timestamp in milliseconds since the Unix epoch. Bumped
    /// by the metadata touch after a message send.
    pub last_activity_ms: u64,
}

impl Conversation {
    /// Whether the given user participates in this conversation.
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }
}

/// A message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Service-assigned identifier.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Sender's user identifier.
    pub sender_id: UserId,
    /// Message body text.
    pub body: String,
    /// Update timestamp in milliseconds since the Unix epoch.
    pub updated_at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display_matches_raw() {
        let id = UserId::new("user-7");
        assert_eq!(id.to_string(), "user-7");
        assert_eq!(id.as_str(), "user-7");
    }

    #[test]
    fn has_participant_checks_membership() {
        let conversation = Conversation {
            id: ConversationId::new("conv-1"),
            title: None,
            participant_ids: vec![UserId::new("a"), UserId::new("b")],
            participant_count: 2,
            last_activity_ms: 0,
        };

        assert!(conversation.has_participant(&UserId::new("a")));
        assert!(!conversation.has_participant(&UserId::new("c")));
    }
}
