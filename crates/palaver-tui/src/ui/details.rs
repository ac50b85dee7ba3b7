//! Participant details panel
//!
//! Lists the mounted conversation's participants with their typing state.
//! Toggled with /details.

use palaver_app::{Activity, App};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the details panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" People ");

    let Some(view) = app.view() else {
        frame.render_widget(List::new(Vec::<ListItem>::new()).block(block), area);
        return;
    };

    let mut participants: Vec<_> = view.participants().values().collect();
    participants.sort_by(|a, b| a.user.display_name.cmp(&b.user.display_name));

    let session_id = app.session().user_id();
    let items: Vec<ListItem> = participants
        .into_iter()
        .map(|participant| {
            let you = if &participant.user.id == session_id { " (you)" } else { "" };
            let mut spans = vec![
                Span::raw(participant.user.display_name.clone()),
                Span::styled(you, Style::default().fg(Color::DarkGray)),
            ];
            if participant.activity == Activity::Typing {
                spans.push(Span::styled(" ~", Style::default().fg(Color::Cyan)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
