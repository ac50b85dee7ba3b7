//! Status bar
//!
//! Displays the session user, the mounted conversation, and transient
//! status messages.

use palaver_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let user = Span::styled(
        app.session().user().display_name.clone(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    );

    let conversation_info = app.view().map_or_else(String::new, |view| {
        format!(
            " | {} | Messages: {}",
            view.title().text(),
            view.feed().len()
        )
    });

    let status_message =
        app.status_message().map_or_else(String::new, |message| format!(" | {message}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        user,
        Span::styled(conversation_info, Style::default().fg(Color::DarkGray)),
        Span::styled(status_message, Style::default().fg(Color::Yellow)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
