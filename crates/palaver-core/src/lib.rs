//! Core types for the Palaver chat client.
//!
//! Defines the data model, the [`ChatService`] boundary behind which the
//! remote chat backend lives, and the client-side collaborators that sit
//! directly on top of that boundary: an ordered observable message list
//! ([`MessageFeed`]), a memoizing user-record loader ([`UserCache`]), and a
//! typing-indicator debouncer ([`TypingDetector`]).
//!
//! Nothing in this crate performs I/O on its own; all remote operations go
//! through a [`ChatService`] implementation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod error;
mod feed;
mod model;
mod service;
mod typing;

pub use cache::UserCache;
pub use error::ServiceError;
pub use feed::MessageFeed;
pub use model::{Conversation, ConversationId, Message, MessageId, User, UserId};
pub use service::ChatService;
pub use typing::{TYPING_QUIET_PERIOD, TypingDetector, TypingEvent, TypingPhase};
