//! The opaque remote-service boundary.
//!
//! Everything the client consumes from the backend crosses [`ChatService`]:
//! user discovery, conversation and message creation, metadata touches, and
//! the two event subscriptions (message changes, typing indicators). The
//! trait is object safe so runtimes can hold an `Arc<dyn ChatService>`.
//!
//! Subscriptions are broadcast receivers; a subscriber that lags simply
//! misses events, matching the best-effort nature of typing indicators.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::{
    error::ServiceError,
    model::{Conversation, ConversationId, Message, User, UserId},
    typing::{TypingEvent, TypingPhase},
};

/// Remote chat backend operations.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Discover user records by exact username.
    ///
    /// Returns an empty list when nothing matches; callers decide whether
    /// that is an error.
    async fn discover_user(&self, username: &str) -> Result<Vec<User>, ServiceError>;

    /// Fetch a single user record by identifier.
    async fn fetch_user(&self, user_id: &UserId) -> Result<User, ServiceError>;

    /// Create a direct conversation between the session user and one other
    /// user.
    async fn create_direct_conversation(
        &self,
        creator: &UserId,
        other: &UserId,
    ) -> Result<Conversation, ServiceError>;

    /// Create a message in a conversation and return the stored record.
    async fn create_message(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        body: &str,
    ) -> Result<Message, ServiceError>;

    /// Fetch the ordered message history of a conversation.
    async fn fetch_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, ServiceError>;

    /// Bump the conversation's last-activity metadata. Fire-and-forget from
    /// the caller's perspective; no ordering guarantee relative to message
    /// creation.
    async fn touch_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<(), ServiceError>;

    /// Subscribe to message change notifications for a conversation.
    fn subscribe_messages(&self, conversation_id: &ConversationId) -> broadcast::Receiver<Message>;

    /// Subscribe to typing-indicator events for a conversation.
    fn subscribe_typing(&self, conversation_id: &ConversationId)
    -> broadcast::Receiver<TypingEvent>;

    /// Publish a typing-indicator phase for the given sender.
    async fn publish_typing(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        phase: TypingPhase,
    ) -> Result<(), ServiceError>;
}
