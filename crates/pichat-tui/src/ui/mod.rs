//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.
//!
//! The window has a fixed size, anchored at the top-left corner and clipped
//! to the terminal:
//!
//! ```text
//! +------ chat (85) ------+-- users --+
//! |                       |           |   24 rows
//! +-----------------------+-----------+
//! +------------ input (116) ----------+
//! |                                   |   3 rows
//! +-----------------------------------+
//!  status
//! ```

mod chat;
mod input;
mod roster;
mod status;

use pichat_app::{AnsiColor, App, input::INPUT_COLUMNS, scrollback};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};

/// Left plus right (or top plus bottom) border.
const BORDER_SIZE: u16 = 2;

/// Full window width: the input area plus its borders and padding.
pub const SCREEN_WIDTH: u16 = INPUT_COLUMNS as u16 + BORDER_SIZE + 2;

/// Chat pane width, borders included.
const CHAT_WIDTH: u16 = scrollback::ROW_WIDTH as u16 + BORDER_SIZE;

/// Main area height, borders included.
const MAIN_HEIGHT: u16 = scrollback::WINDOW_HEIGHT as u16 + BORDER_SIZE;

/// Rows of typed text in the input area.
pub const INPUT_ROWS: u16 = 3;

/// Input area height, borders included.
const INPUT_HEIGHT: u16 = INPUT_ROWS + BORDER_SIZE;

const STATUS_HEIGHT: u16 = 1;

/// Full window height.
pub const SCREEN_HEIGHT: u16 = MAIN_HEIGHT + INPUT_HEIGHT + STATUS_HEIGHT;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area().intersection(Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MAIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, app, *input_area);
    status::render(frame, app, *status_area);
}

/// Render the main area (chat + roster).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CHAT_WIDTH), Constraint::Min(0)])
        .split(area);

    let [chat_area, roster_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, app, *chat_area);
    roster::render(frame, app, *roster_area);
}

/// Terminal color for an SGR foreground color. SGR 37 is ratatui's `Gray`.
pub fn color(color: AnsiColor) -> Color {
    match color {
        AnsiColor::Red => Color::Red,
        AnsiColor::Green => Color::Green,
        AnsiColor::Yellow => Color::Yellow,
        AnsiColor::Blue => Color::Blue,
        AnsiColor::Magenta => Color::Magenta,
        AnsiColor::Cyan => Color::Cyan,
        AnsiColor::White => Color::Gray,
    }
}
