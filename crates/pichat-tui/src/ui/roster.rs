//! Roster pane
//!
//! Displays the latest USERS listing.

use pichat_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, List, ListItem},
};

use super::color;

/// Render the roster pane.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.window)))
        .title(" Users ");

    let style = Style::default().fg(color(palette.other));
    let items: Vec<ListItem> =
        app.roster().iter().map(|entry| ListItem::new(Line::styled(entry.as_str(), style))).collect();

    frame.render_widget(List::new(items).block(block), area);
}
