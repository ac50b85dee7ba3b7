//! Conversation sidebar
//!
//! Displays the conversation list with unread indicators, most recently
//! active first.

use palaver_app::{App, Title};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";
const UNREAD_MARKER: &str = "*";
const EMPTY_MARKER: &str = "";

enum EntryDisplayState {
    Active,
    Unread,
    Normal,
}

/// Render the conversation sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let active_id = app.view().map(|v| v.conversation_id().clone());

    let items: Vec<ListItem> = app
        .conversations()
        .iter()
        .map(|conversation| {
            let state = if active_id.as_ref() == Some(&conversation.id) {
                EntryDisplayState::Active
            } else if app.is_unread(&conversation.id) {
                EntryDisplayState::Unread
            } else {
                EntryDisplayState::Normal
            };

            // The resolved title only exists for the mounted view; other
            // entries show the explicit title or the raw id.
            let name = match (&active_id, conversation.title.as_deref()) {
                (Some(id), _) if id == &conversation.id => app
                    .view()
                    .map_or_else(|| conversation.id.as_str().to_owned(), |v| match v.title() {
                        Title::Loading => conversation.id.as_str().to_owned(),
                        Title::Explicit(t) | Title::Resolved(t) => t.clone(),
                    }),
                (_, Some(title)) => title.to_owned(),
                (_, None) => conversation.id.as_str().to_owned(),
            };

            let (prefix, suffix, style) = match state {
                EntryDisplayState::Active => (
                    ACTIVE_PREFIX,
                    EMPTY_MARKER,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                EntryDisplayState::Unread => {
                    (INACTIVE_PREFIX, UNREAD_MARKER, Style::default().fg(Color::Cyan))
                },
                EntryDisplayState::Normal => (INACTIVE_PREFIX, EMPTY_MARKER, Style::default()),
            };

            let unread_style = Style::default().fg(Color::Red);

            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(name, style),
                Span::styled(suffix, unread_style),
            ]))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Chats ");
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
