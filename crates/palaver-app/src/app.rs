//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the client completely decoupled from I/O and the
//! chat service.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the conversation list, unread badges, and the mounted view.
//! - Routes service events to the mounted [`ConversationView`] and the open
//!   [`CreateChatDialog`].
//! - Consumes the shell-scoped dialog actions (close, add conversation)
//!   before the rest reach the runtime.

use std::collections::HashSet;

use palaver_core::{Conversation, ConversationId, TypingPhase};

use crate::{AppAction, AppEvent, ConversationView, CreateChatDialog, Session};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// The authenticated user.
    session: Session,
    /// Sidebar entries, most recently active first.
    conversations: Vec<Conversation>,
    /// Conversations with activity since they were last viewed.
    unread: HashSet<ConversationId>,
    /// The mounted conversation view. `None` until one is selected.
    view: Option<ConversationView>,
    /// The create-chat modal. `None` while closed.
    dialog: Option<CreateChatDialog>,
    /// Whether the participant details panel is shown.
    details_open: bool,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App for the given session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            conversations: Vec::new(),
            unread: HashSet::new(),
            view: None,
            dialog: None,
            details_open: false,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::HistoryLoaded { conversation_id, messages } => {
                match self.view.as_mut().filter(|v| v.conversation_id() == &conversation_id) {
                    Some(view) => view.on_history_loaded(messages),
                    None => vec![],
                }
            },
            AppEvent::ParticipantsLoaded { conversation_id, users } => {
                match self.view.as_mut().filter(|v| v.conversation_id() == &conversation_id) {
                    Some(view) => view.on_participants_loaded(users, &self.session),
                    None => vec![],
                }
            },
            AppEvent::MessageArrived { message } | AppEvent::MessagePosted { message } => {
                self.touch_sidebar(&message.conversation_id, message.updated_at_ms);
                let mut actions = match self.view.as_mut() {
                    Some(view) => view.on_message(message),
                    None => vec![],
                };
                if actions.is_empty() {
                    // Sidebar badges still need repainting
                    actions.push(AppAction::Render);
                }
                actions
            },
            AppEvent::Typing { event } => match self.view.as_mut() {
                Some(view) => view.on_typing(&event),
                None => vec![],
            },
            AppEvent::UsersDiscovered { username, users } => match self.dialog.as_mut() {
                Some(dialog) => dialog.on_users_discovered(&username, users),
                None => vec![],
            },
            AppEvent::ConversationCreated { conversation } => {
                let actions = match self.dialog.as_mut() {
                    Some(dialog) => dialog.on_conversation_created(conversation),
                    None => vec![],
                };
                self.absorb(actions)
            },
            AppEvent::RequestFailed { message } => match self.dialog.as_mut() {
                Some(dialog) => dialog.on_request_failed(message),
                None => {
                    self.status_message = Some(format!("Error: {message}"));
                    vec![AppAction::Render]
                },
            },
        }
    }

    /// Select a conversation: unmount the current view, mount the new one,
    /// and clear its unread badge.
    pub fn select_conversation(&mut self, conversation_id: &ConversationId) -> Vec<AppAction> {
        let Some(conversation) =
            self.conversations.iter().find(|c| &c.id == conversation_id).cloned()
        else {
            return vec![];
        };
        if self.view.as_ref().is_some_and(|v| v.conversation_id() == conversation_id) {
            return vec![];
        }

        let mut actions = self.view.as_ref().map(ConversationView::unmount).unwrap_or_default();

        self.unread.remove(conversation_id);
        let (view, mount_actions) = ConversationView::mount(conversation);
        self.view = Some(view);
        actions.extend(mount_actions);
        actions
    }

    /// Add a conversation to the sidebar and select it.
    pub fn add_conversation(&mut self, conversation: Conversation) -> Vec<AppAction> {
        let id = conversation.id.clone();
        if !self.conversations.iter().any(|c| c.id == id) {
            self.conversations.push(conversation);
            self.sort_sidebar();
        }
        self.select_conversation(&id)
    }

    /// Open the create-chat dialog.
    pub fn open_dialog(&mut self) -> Vec<AppAction> {
        self.dialog = Some(CreateChatDialog::new());
        vec![AppAction::Render]
    }

    /// Close the create-chat dialog without creating anything.
    pub fn close_dialog(&mut self) -> Vec<AppAction> {
        self.dialog = None;
        vec![AppAction::Render]
    }

    /// Submit the mounted view's composer.
    pub fn compose(&mut self, body: &str) -> Vec<AppAction> {
        match self.view.as_ref() {
            Some(view) => view.compose(body),
            None => vec![],
        }
    }

    /// Publish a typing phase for the mounted conversation.
    pub fn publish_typing(&self, phase: TypingPhase) -> Vec<AppAction> {
        match self.view.as_ref() {
            Some(view) => vec![AppAction::PublishTyping {
                conversation_id: view.conversation_id().clone(),
                phase,
            }],
            None => vec![],
        }
    }

    /// Toggle the participant details panel.
    pub fn toggle_details(&mut self) -> Vec<AppAction> {
        self.details_open = !self.details_open;
        vec![AppAction::Render]
    }

    /// Quit the application, releasing the mounted view's subscriptions.
    pub fn quit(&mut self) -> Vec<AppAction> {
        let mut actions = self.view.as_ref().map(ConversationView::unmount).unwrap_or_default();
        self.view = None;
        actions.push(AppAction::Quit);
        actions
    }

    /// Record new terminal dimensions.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Vec<AppAction> {
        self.terminal_size = (cols, rows);
        vec![AppAction::Render]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// The authenticated session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sidebar entries, most recently active first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Whether a conversation has unseen activity.
    pub fn is_unread(&self, conversation_id: &ConversationId) -> bool {
        self.unread.contains(conversation_id)
    }

    /// The mounted view. `None` until a conversation is selected.
    pub fn view(&self) -> Option<&ConversationView> {
        self.view.as_ref()
    }

    /// The open create-chat dialog. `None` while closed.
    pub fn dialog(&self) -> Option<&CreateChatDialog> {
        self.dialog.as_ref()
    }

    /// Dialog keystrokes are routed here by the front end.
    pub fn dialog_mut(&mut self) -> Option<&mut CreateChatDialog> {
        self.dialog.as_mut()
    }

    /// Whether the participant details panel is shown.
    pub fn details_open(&self) -> bool {
        self.details_open
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Consume shell-scoped actions, forwarding the rest to the runtime.
    fn absorb(&mut self, actions: Vec<AppAction>) -> Vec<AppAction> {
        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                AppAction::CloseDialog => {
                    self.dialog = None;
                    out.push(AppAction::Render);
                },
                AppAction::AddConversation { conversation } => {
                    out.extend(self.add_conversation(conversation));
                },
                other => out.push(other),
            }
        }
        out
    }

    fn touch_sidebar(&mut self, conversation_id: &ConversationId, activity_ms: u64) {
        let viewing =
            self.view.as_ref().is_some_and(|v| v.conversation_id() == conversation_id);
        if let Some(entry) = self.conversations.iter_mut().find(|c| &c.id == conversation_id) {
            entry.last_activity_ms = entry.last_activity_ms.max(activity_ms);
            if !viewing {
                self.unread.insert(conversation_id.clone());
            }
            self.sort_sidebar();
        }
    }

    fn sort_sidebar(&mut self) {
        self.conversations.sort_by(|a, b| {
            b.last_activity_ms
                .cmp(&a.last_activity_ms)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
    }
}
