//! Application side-effects and intents.
//!
//! Actions are instructions produced by the state machines for the runtime
//! to execute. Remote operations resolve asynchronously and come back as
//! [`AppEvent`](crate::AppEvent)s.

use palaver_core::{Conversation, ConversationId, TypingPhase, User, UserId};

/// Actions produced by the [`App`](crate::App) state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Subscribe to message and typing events for a conversation.
    Subscribe {
        /// Conversation to subscribe to.
        conversation_id: ConversationId,
    },

    /// Release both subscriptions for a conversation. Emitted on unmount;
    /// runtimes are required to honor it.
    Unsubscribe {
        /// Conversation to unsubscribe from.
        conversation_id: ConversationId,
    },

    /// Fetch the message history of a conversation.
    LoadHistory {
        /// Conversation to fetch.
        conversation_id: ConversationId,
    },

    /// Resolve participant user records concurrently.
    LoadParticipants {
        /// Conversation the participants belong to.
        conversation_id: ConversationId,
        /// Identifiers to resolve.
        user_ids: Vec<UserId>,
    },

    /// Create a message in a conversation.
    PostMessage {
        /// Target conversation.
        conversation_id: ConversationId,
        /// Message body.
        body: String,
    },

    /// Fire-and-forget conversation metadata touch.
    TouchConversation {
        /// Conversation to touch.
        conversation_id: ConversationId,
    },

    /// Publish a typing-indicator phase for the session user.
    PublishTyping {
        /// Target conversation.
        conversation_id: ConversationId,
        /// Phase to publish.
        phase: TypingPhase,
    },

    /// Discover user records by username.
    DiscoverUser {
        /// Username to look up.
        username: String,
    },

    /// Create a direct conversation with the given user.
    CreateDirectConversation {
        /// The discovered peer.
        user: User,
    },

    /// Close the create-chat dialog. Consumed by the shell, never by the
    /// runtime.
    CloseDialog,

    /// Hand a newly created conversation to the shell. Consumed by the
    /// shell, never by the runtime.
    AddConversation {
        /// The new conversation.
        conversation: Conversation,
    },
}
