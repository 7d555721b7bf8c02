//! Chat area
//!
//! Displays the scroll window of the chat history.

use pichat_app::{App, Palette};
use pichat_proto::RowSource;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, List, ListItem},
};

use super::color;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.window)))
        .title(" pichat ");

    let items: Vec<ListItem> = app
        .scrollback()
        .visible_rows()
        .into_iter()
        .map(|row| {
            let style = match row.source() {
                RowSource::Own => Style::default().fg(color(palette.own)),
                RowSource::Other => Style::default().fg(color(palette.other)),
                RowSource::Error => Style::default().fg(color(Palette::ALERT)),
                RowSource::Plain => Style::default(),
            };
            ListItem::new(Line::styled(row.text(), style))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
