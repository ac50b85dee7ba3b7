//! Conversation area
//!
//! Displays the header (title and participant count), the message feed, and
//! the typing-indicator line for the mounted conversation.

use palaver_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;
const TYPING_LINE_HEIGHT: u16 = 1;

/// Render the conversation area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.view() else {
        let block = Block::default().borders(Borders::ALL).title(" No Chat ");
        let items = vec![ListItem::new(Line::from(Span::styled(
            "Use /new to start a conversation",
            Style::default().fg(Color::DarkGray),
        )))];
        frame.render_widget(List::new(items).block(block), area);
        return;
    };

    let title =
        format!(" {} ({} people) ", view.title().text(), view.participant_count());
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = view
        .feed()
        .messages()
        .iter()
        .map(|message| {
            let sender = format!("<{}>", view.sender_name(&message.sender_id));

            ListItem::new(Line::from(vec![
                Span::styled(
                    sender,
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(message.body.clone()),
            ]))
        })
        .collect();

    // Tail-render: newest messages stay visible
    let visible_height =
        area.height.saturating_sub(BORDER_SIZE + TYPING_LINE_HEIGHT) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);

    let typing = view.typing_line(app.session());
    if !typing.is_empty() && area.height > BORDER_SIZE {
        let typing_area = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(area.height).saturating_sub(BORDER_SIZE),
            width: area.width.saturating_sub(BORDER_SIZE),
            height: TYPING_LINE_HEIGHT,
        };
        let line = Line::from(Span::styled(
            typing,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(ratatui::widgets::Paragraph::new(line), typing_area);
    }
}
