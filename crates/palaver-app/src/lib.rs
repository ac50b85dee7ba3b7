//! Application layer for Palaver.
//!
//! Pure state machines for the chat client views, completely decoupled from
//! I/O: they consume [`AppEvent`] inputs and produce [`AppAction`]
//! instructions for a runtime to execute against a
//! [`ChatService`](palaver_core::ChatService).
//!
//! # Components
//!
//! - [`App`]: shell owning the conversation list, the active view, and the
//!   create-chat dialog
//! - [`ConversationView`]: per-conversation state (title, participants,
//!   typing flags, message feed)
//! - [`CreateChatDialog`]: username discovery and direct-chat creation flow
//! - [`Session`]: explicit current-user injection

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod dialog;
mod event;
mod session;
mod title;
mod view;

pub use action::AppAction;
pub use app::App;
pub use dialog::{CreateChatDialog, DialogState};
pub use event::AppEvent;
pub use session::Session;
pub use title::participant_title;
pub use view::{Activity, ConversationView, Participant, Title};
