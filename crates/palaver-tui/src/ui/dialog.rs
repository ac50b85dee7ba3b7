//! Create-chat dialog overlay
//!
//! A centered modal with a username field and an inline error line. While a
//! request is pending the field is shown dimmed.

use palaver_app::{CreateChatDialog, DialogState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 6;

/// Render the dialog overlay.
pub fn render(frame: &mut Frame, dialog: &CreateChatDialog, area: Rect) {
    let overlay = super::centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, overlay);

    let field_style = if dialog.is_enabled() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let state_line = match dialog.state() {
        DialogState::Idle => Line::from(Span::styled(
            "Enter a username, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
        DialogState::Loading => {
            Line::from(Span::styled("Looking up user...", Style::default().fg(Color::Yellow)))
        },
        DialogState::Failed(message) => {
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red)))
        },
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Username: "),
            Span::styled(dialog.username().to_owned(), field_style),
        ]),
        Line::default(),
        state_line,
    ];

    let block = Block::default().borders(Borders::ALL).title(" New Chat ");
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}
