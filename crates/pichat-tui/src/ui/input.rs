//! Input area
//!
//! Displays the typed line, wrapped at the input width, with the cursor.

use pichat_app::{App, input::INPUT_COLUMNS};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use super::color;

const TEXT_OFFSET: u16 = 1; // inside the border

/// Render the input area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.window)));

    let chars: Vec<char> = app.input().line().chars().collect();
    let lines: Vec<Line> =
        chars.chunks(INPUT_COLUMNS).map(|chunk| Line::from(chunk.iter().collect::<String>())).collect();
    let paragraph = Paragraph::new(lines).style(Style::default().fg(color(palette.own))).block(block);

    frame.render_widget(paragraph, area);

    let cursor = app.input().cursor();
    let max_x = area.right().saturating_sub(TEXT_OFFSET + 1);
    let max_y = area.bottom().saturating_sub(TEXT_OFFSET + 1);
    let cursor_x = area.x.saturating_add(TEXT_OFFSET).saturating_add(cursor.col).min(max_x);
    let cursor_y = area.y.saturating_add(TEXT_OFFSET).saturating_add(cursor.row).min(max_y);

    frame.set_cursor_position((cursor_x, cursor_y));
}
