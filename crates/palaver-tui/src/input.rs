//! Input state and key handling for the TUI.
//!
//! This module owns the composer state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter. While
//! the create-chat dialog is open, keys are routed to it instead.

use palaver_app::{App, AppAction};

use crate::commands::{self, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Composer state for the TUI.
///
/// Manages the text input buffer and cursor position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Byte offset of the cursor within the buffer; always on a char
    /// boundary.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the composer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position as a byte offset into the buffer.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position as a display column (chars before the cursor).
    pub fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        if app.dialog().is_some() {
            return Self::handle_dialog_key(key, app);
        }

        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor = self.cursor.saturating_add(c.len_utf8());
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
                    self.cursor = self.cursor.saturating_sub(c.len_utf8());
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
                    self.cursor = self.cursor.saturating_sub(c.len_utf8());
                }
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if let Some(c) = self.buffer[self.cursor..].chars().next() {
                    self.cursor = self.cursor.saturating_add(c.len_utf8());
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.buffer.len();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab => Self::cycle_conversation(app),
            KeyInput::Esc => app.quit(),
            KeyInput::Up | KeyInput::Down => vec![],
        }
    }

    /// Route a key to the open create-chat dialog.
    fn handle_dialog_key(key: KeyInput, app: &mut App) -> Vec<AppAction> {
        if key == KeyInput::Esc {
            return app.close_dialog();
        }
        let Some(dialog) = app.dialog_mut() else {
            return vec![];
        };
        match key {
            KeyInput::Char(c) => dialog.push_char(c),
            KeyInput::Backspace => dialog.pop_char(),
            KeyInput::Enter => dialog.submit(),
            _ => vec![],
        }
    }

    /// Handle Enter - parse the buffer and call the App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.is_empty() {
            return vec![];
        }

        match commands::parse(&text) {
            Command::NewChat => app.open_dialog(),
            Command::Details => app.toggle_details(),
            Command::Next => Self::cycle_conversation(app),
            Command::Quit => app.quit(),
            Command::Message { body } => {
                if app.view().is_none() {
                    app.set_status("No conversation selected");
                    return vec![AppAction::Render];
                }
                app.compose(&body)
            },
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Switch to the next conversation in sidebar order, wrapping around.
    fn cycle_conversation(app: &mut App) -> Vec<AppAction> {
        let ids: Vec<_> = app.conversations().iter().map(|c| c.id.clone()).collect();
        if ids.is_empty() {
            return vec![];
        }

        let current = app
            .view()
            .and_then(|view| ids.iter().position(|id| id == view.conversation_id()));
        let next = current.map_or(0, |idx| idx.saturating_add(1) % ids.len());

        match ids.get(next) {
            Some(id) => app.select_conversation(id),
            None => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use palaver_app::{DialogState, Session};
    use palaver_core::{Conversation, ConversationId, User, UserId};

    use super::*;

    fn app() -> App {
        App::new(Session::new(User::new("me", "Me")))
    }

    fn conversation(id: &str, activity_ms: u64) -> Conversation {
        Conversation {
            id: ConversationId::new(id),
            title: None,
            participant_ids: vec![UserId::new("me"), UserId::new("other")],
            participant_count: 2,
            last_activity_ms: activity_ms,
        }
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let mut app = app();

        let _ = input.handle_key(KeyInput::Char('h'), &mut app);
        let _ = input.handle_key(KeyInput::Char('i'), &mut app);

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();
        let mut app = app();

        let _ = input.handle_key(KeyInput::Char('a'), &mut app);
        let _ = input.handle_key(KeyInput::Char('b'), &mut app);
        let _ = input.handle_key(KeyInput::Backspace, &mut app);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn enter_clears_buffer() {
        let mut input = InputState::new();
        let mut app = app();

        for c in "/new".chars() {
            let _ = input.handle_key(KeyInput::Char(c), &mut app);
        }
        let _ = input.handle_key(KeyInput::Enter, &mut app);

        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
        assert!(app.dialog().is_some());
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        let mut app = app();

        let _ = input.handle_key(KeyInput::Char('a'), &mut app);
        let _ = input.handle_key(KeyInput::Char('b'), &mut app);
        let _ = input.handle_key(KeyInput::Char('c'), &mut app);

        let _ = input.handle_key(KeyInput::Home, &mut app);
        assert_eq!(input.cursor(), 0);

        let _ = input.handle_key(KeyInput::End, &mut app);
        assert_eq!(input.cursor(), 3);

        let _ = input.handle_key(KeyInput::Left, &mut app);
        assert_eq!(input.cursor(), 2);

        let _ = input.handle_key(KeyInput::Right, &mut app);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn multibyte_chars_keep_cursor_on_boundaries() {
        let mut input = InputState::new();
        let mut app = app();

        let _ = input.handle_key(KeyInput::Char('é'), &mut app);
        let _ = input.handle_key(KeyInput::Char('x'), &mut app);

        assert_eq!(input.buffer(), "éx");
        assert_eq!(input.cursor(), "éx".len());
        assert_eq!(input.cursor_column(), 2);

        let _ = input.handle_key(KeyInput::Backspace, &mut app);
        let _ = input.handle_key(KeyInput::Backspace, &mut app);
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);

        // Backspace on an empty buffer stays put
        let _ = input.handle_key(KeyInput::Backspace, &mut app);
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn cursor_steps_over_whole_chars() {
        let mut input = InputState::new();
        let mut app = app();

        for c in "aé日b".chars() {
            let _ = input.handle_key(KeyInput::Char(c), &mut app);
        }

        let _ = input.handle_key(KeyInput::Home, &mut app);
        let _ = input.handle_key(KeyInput::Right, &mut app);
        let _ = input.handle_key(KeyInput::Right, &mut app);
        assert_eq!(input.cursor(), "aé".len());
        assert_eq!(input.cursor_column(), 2);

        // Insert and delete in the middle never split a char
        let _ = input.handle_key(KeyInput::Char('z'), &mut app);
        assert_eq!(input.buffer(), "aéz日b");

        let _ = input.handle_key(KeyInput::Delete, &mut app);
        assert_eq!(input.buffer(), "aézb");

        let _ = input.handle_key(KeyInput::Left, &mut app);
        assert_eq!(input.cursor(), "aé".len());

        let _ = input.handle_key(KeyInput::End, &mut app);
        assert_eq!(input.cursor(), "aézb".len());
    }

    #[test]
    fn tab_cycles_conversations() {
        let mut input = InputState::new();
        let mut app = app();

        let _ = app.add_conversation(conversation("conv-1", 10));
        let _ = app.add_conversation(conversation("conv-2", 20));
        assert_eq!(
            app.view().map(|v| v.conversation_id().as_str().to_owned()),
            Some("conv-2".to_owned())
        );

        // Sidebar order is most-recent-first, so conv-2 sits at index 0
        let _ = input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(
            app.view().map(|v| v.conversation_id().as_str().to_owned()),
            Some("conv-1".to_owned())
        );

        // Tab wraps around
        let _ = input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(
            app.view().map(|v| v.conversation_id().as_str().to_owned()),
            Some("conv-2".to_owned())
        );
    }

    #[test]
    fn dialog_captures_keys_while_open() {
        let mut input = InputState::new();
        let mut app = app();
        let _ = app.open_dialog();

        let _ = input.handle_key(KeyInput::Char('a'), &mut app);
        let _ = input.handle_key(KeyInput::Char('d'), &mut app);
        let _ = input.handle_key(KeyInput::Char('a'), &mut app);

        assert!(input.buffer().is_empty());
        assert_eq!(app.dialog().map(palaver_app::CreateChatDialog::username), Some("ada"));

        let actions = input.handle_key(KeyInput::Enter, &mut app);
        assert!(actions.iter().any(|a| matches!(a,
            AppAction::DiscoverUser { username } if username == "ada")));
        assert_eq!(app.dialog().map(|d| d.state().clone()), Some(DialogState::Loading));
    }

    #[test]
    fn esc_closes_dialog_without_quitting() {
        let mut input = InputState::new();
        let mut app = app();
        let _ = app.open_dialog();

        let actions = input.handle_key(KeyInput::Esc, &mut app);

        assert!(app.dialog().is_none());
        assert!(!actions.contains(&AppAction::Quit));
    }
}
