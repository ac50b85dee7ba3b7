//! Create-chat dialog state machine.
//!
//! A modal flow for starting a direct conversation: the user enters a
//! username, discovery runs, and on success the conversation is created and
//! handed to the shell. The form stays disabled while a request is pending
//! and re-enables on failure with the error displayed inline.

use palaver_core::{Conversation, User};

use crate::AppAction;

/// Lifecycle of the dialog's remote request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    /// Form editable, no request pending.
    #[default]
    Idle,
    /// Discovery or creation in flight; the form is disabled.
    Loading,
    /// The last request failed; the form is editable again.
    Failed(String),
}

/// State machine for the create-chat modal.
#[derive(Debug, Clone, Default)]
pub struct CreateChatDialog {
    username: String,
    state: DialogState,
}

impl CreateChatDialog {
    /// Open the dialog with an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current request state.
    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Username typed so far.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the form accepts edits and submissions.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, DialogState::Loading)
    }

    /// Append a character to the username field. Ignored while loading.
    pub fn push_char(&mut self, c: char) -> Vec<AppAction> {
        if !self.is_enabled() {
            return vec![];
        }
        self.username.push(c);
        vec![AppAction::Render]
    }

    /// Delete the last character of the username field. Ignored while
    /// loading.
    pub fn pop_char(&mut self) -> Vec<AppAction> {
        if !self.is_enabled() {
            return vec![];
        }
        self.username.pop();
        vec![AppAction::Render]
    }

    /// Submit the form, starting user discovery.
    ///
    /// An empty username and a submit while a request is already pending
    /// are both ignored.
    pub fn submit(&mut self) -> Vec<AppAction> {
        if !self.is_enabled() || self.username.is_empty() {
            return vec![];
        }

        self.state = DialogState::Loading;
        vec![AppAction::DiscoverUser { username: self.username.clone() }, AppAction::Render]
    }

    /// Handle completed user discovery.
    ///
    /// Zero matches fails the form with an inline error naming the
    /// username; otherwise conversation creation starts with the first
    /// match and the form stays disabled.
    pub fn on_users_discovered(&mut self, username: &str, users: Vec<User>) -> Vec<AppAction> {
        match users.into_iter().next() {
            Some(user) => vec![AppAction::CreateDirectConversation { user }],
            None => {
                self.state = DialogState::Failed(format!("Error: user \"{username}\" not found"));
                vec![AppAction::Render]
            }
        }
    }

    /// Handle the created conversation: close first, then hand the
    /// conversation to the shell. Exactly once each, in that order.
    pub fn on_conversation_created(&mut self, conversation: Conversation) -> Vec<AppAction> {
        vec![AppAction::CloseDialog, AppAction::AddConversation { conversation }]
    }

    /// Handle a failed remote request, re-enabling the form.
    pub fn on_request_failed(&mut self, message: String) -> Vec<AppAction> {
        self.state = DialogState::Failed(format!("Error: {message}"));
        vec![AppAction::Render]
    }
}

#[cfg(test)]
mod tests {
    use palaver_core::{ConversationId, UserId};

    use super::*;

    fn submitted(username: &str) -> CreateChatDialog {
        let mut dialog = CreateChatDialog::new();
        for c in username.chars() {
            let _ = dialog.push_char(c);
        }
        let _ = dialog.submit();
        dialog
    }

    fn conversation() -> Conversation {
        Conversation {
            id: ConversationId::new("conv-9"),
            title: None,
            participant_ids: vec![UserId::new("me"), UserId::new("ada")],
            participant_count: 2,
            last_activity_ms: 0,
        }
    }

    #[test]
    fn submit_starts_discovery_and_disables_form() {
        let mut dialog = CreateChatDialog::new();
        for c in "ada".chars() {
            let _ = dialog.push_char(c);
        }

        let actions = dialog.submit();
        assert!(matches!(actions.as_slice(),
            [AppAction::DiscoverUser { username }, AppAction::Render] if username == "ada"));
        assert!(!dialog.is_enabled());
    }

    #[test]
    fn empty_username_is_not_submitted() {
        let mut dialog = CreateChatDialog::new();
        assert!(dialog.submit().is_empty());
        assert_eq!(dialog.state(), &DialogState::Idle);
    }

    #[test]
    fn edits_are_ignored_while_loading() {
        let mut dialog = submitted("ada");

        assert!(dialog.push_char('x').is_empty());
        assert!(dialog.pop_char().is_empty());
        assert!(dialog.submit().is_empty());
        assert_eq!(dialog.username(), "ada");
    }

    #[test]
    fn no_match_fails_with_exact_error_and_re_enables() {
        let mut dialog = submitted("nobody");

        let _ = dialog.on_users_discovered("nobody", vec![]);

        assert_eq!(
            dialog.state(),
            &DialogState::Failed("Error: user \"nobody\" not found".to_owned())
        );
        assert!(dialog.is_enabled());
    }

    #[test]
    fn first_match_starts_creation() {
        let mut dialog = submitted("ada");

        let actions = dialog.on_users_discovered(
            "ada",
            vec![User::new("ada", "Ada"), User::new("ada2", "Other Ada")],
        );

        assert!(matches!(actions.as_slice(),
            [AppAction::CreateDirectConversation { user }] if user.id.as_str() == "ada"));
        assert!(!dialog.is_enabled());
    }

    #[test]
    fn success_closes_then_delegates_once_each() {
        let mut dialog = submitted("ada");
        let _ = dialog.on_users_discovered("ada", vec![User::new("ada", "Ada")]);

        let actions = dialog.on_conversation_created(conversation());

        assert!(matches!(actions.as_slice(), [
            AppAction::CloseDialog,
            AppAction::AddConversation { conversation }
        ] if conversation.id.as_str() == "conv-9"));
    }

    #[test]
    fn failure_re_enables_with_message() {
        let mut dialog = submitted("ada");

        let _ = dialog.on_request_failed("connection reset".to_owned());

        assert_eq!(
            dialog.state(),
            &DialogState::Failed("Error: connection reset".to_owned())
        );
        assert!(dialog.is_enabled());
    }
}
