//! Error types for the service boundary.
//!
//! All remote operations surface a [`ServiceError`]. Views render these as
//! plain text; there are no structured error codes and no retry policy.

use thiserror::Error;

use crate::model::{ConversationId, UserId};

/// Errors surfaced by a [`ChatService`](crate::ChatService) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Discovery by username matched no user record.
    #[error("user \"{username}\" not found")]
    UserNotFound {
        /// Username that was looked up.
        username: String,
    },

    /// No user record exists for the given identifier.
    #[error("no user record for {user_id}")]
    UnknownUser {
        /// Identifier that was looked up.
        user_id: UserId,
    },

    /// The conversation does not exist on the service.
    #[error("conversation {conversation_id} not found")]
    ConversationNotFound {
        /// Identifier that was looked up.
        conversation_id: ConversationId,
    },

    /// Arbitrary remote-operation failure, propagated with its message.
    #[error("{0}")]
    Remote(String),
}
