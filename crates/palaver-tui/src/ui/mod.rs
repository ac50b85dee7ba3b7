//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod compose;
mod details;
mod dialog;
mod sidebar;
mod status;

use palaver_app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::InputState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const COMPOSE_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(COMPOSE_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, compose_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    compose::render(frame, input, *compose_area);
    status::render(frame, app, *status_area);

    if let Some(open) = app.dialog() {
        dialog::render(frame, open, frame.area());
    }
}

/// Render the main area (sidebar + conversation + optional details panel).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const SIDEBAR_WIDTH: u16 = 24;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;
    const DETAILS_WIDTH: u16 = 28;

    let constraints = if app.details_open() {
        vec![
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Min(CHAT_AREA_MIN_WIDTH),
            Constraint::Length(DETAILS_WIDTH),
        ]
    } else {
        vec![Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)]
    };

    let chunks =
        Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area);

    match chunks.as_ref() {
        [sidebar_area, chat_area, details_area] => {
            sidebar::render(frame, app, *sidebar_area);
            chat::render(frame, app, *chat_area);
            details::render(frame, app, *details_area);
        },
        [sidebar_area, chat_area] => {
            sidebar::render(frame, app, *sidebar_area);
            chat::render(frame, app, *chat_area);
        },
        _ => {},
    }
}

/// Centered overlay rectangle for the create-chat dialog.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
    let y = area.y.saturating_add(area.height.saturating_sub(height) / 2);
    Rect { x, y, width: width.min(area.width), height: height.min(area.height) }
}
