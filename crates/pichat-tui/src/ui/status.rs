//! Status bar
//!
//! Displays the session state, the latest status message and key hints.

use pichat_app::{App, SessionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const KEY_HINTS: &str = " | 1/2/3 colors  -/+ scroll  Tab clear  Esc quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let session = match app.state() {
        SessionState::LoggingIn => {
            Span::styled("Logging in...", Style::default().fg(Color::Yellow))
        },
        SessionState::Online => Span::styled(
            app.username().to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let message = app.status_message().map_or_else(String::new, |m| format!(" | {m}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        session,
        Span::raw(message),
        Span::styled(KEY_HINTS, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
