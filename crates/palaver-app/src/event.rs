//! Application input events.
//!
//! Events originate from two sources: asynchronous results of remote
//! operations the runtime executed on the views' behalf, and service
//! subscriptions (message changes, typing indicators).

use palaver_core::{Conversation, ConversationId, Message, TypingEvent, User};

/// Events processed by the [`App`](crate::App) state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Message history fetch completed.
    HistoryLoaded {
        /// Conversation the history belongs to.
        conversation_id: ConversationId,
        /// Messages in service order.
        messages: Vec<Message>,
    },

    /// Participant records resolved after a view mounted.
    ParticipantsLoaded {
        /// Conversation the participants belong to.
        conversation_id: ConversationId,
        /// One record per participant id, in request order.
        users: Vec<User>,
    },

    /// A message arrived over the change subscription.
    MessageArrived {
        /// The new or updated message.
        message: Message,
    },

    /// Our own message-create request completed.
    MessagePosted {
        /// The stored message record.
        message: Message,
    },

    /// A typing-indicator event arrived over the typing subscription.
    Typing {
        /// The event, keyed by composite identifiers.
        event: TypingEvent,
    },

    /// User discovery completed.
    UsersDiscovered {
        /// Username that was looked up.
        username: String,
        /// Matching records; may be empty.
        users: Vec<User>,
    },

    /// Direct-conversation creation completed.
    ConversationCreated {
        /// The new conversation.
        conversation: Conversation,
    },

    /// A dialog-scoped remote operation failed.
    RequestFailed {
        /// Human-readable failure description.
        message: String,
    },
}
