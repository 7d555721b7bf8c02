//! Rendering tests against ratatui's in-memory backend.

#![allow(clippy::unwrap_used)]

use bytes::Bytes;
use pichat_app::{App, AppEvent, KeyInput};
use pichat_tui::ui::{self, SCREEN_HEIGHT, SCREEN_WIDTH};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, style::Color};

fn draw(app: &App) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(SCREEN_WIDTH, SCREEN_HEIGHT)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
}

/// Find the first cell where `needle` starts.
fn find(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
    (0..buffer.area.height).find_map(|y| {
        let text = row_text(buffer, y);
        text.find(needle).map(|x| (text[..x].chars().count() as u16, y))
    })
}

fn online_app() -> App {
    let mut app = App::new("bob");
    app.handle(AppEvent::LoggedIn);
    app.handle(AppEvent::Data(Bytes::from_static(b"+bob (you) <online>\nalice <online>\n")));
    app
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle(AppEvent::Key(KeyInput::Char(c)));
    }
}

#[test]
fn roster_is_drawn_in_other_color() {
    let buffer = draw(&online_app());

    let (x, y) = find(&buffer, "alice <online>").unwrap();
    assert_eq!(buffer[(x, y)].fg, Color::Yellow);
    assert!(find(&buffer, " Users ").is_some());
}

#[test]
fn rows_are_colored_by_source() {
    let mut app = online_app();
    app.handle(AppEvent::Data(Bytes::from_static(b"MSGFROM [09:00 alice]: morning\n")));
    app.handle(AppEvent::Data(Bytes::from_static(b"+alice <online>\n")));
    type_str(&mut app, "@nobody hi");
    app.handle(AppEvent::Key(KeyInput::Enter));
    app.handle(AppEvent::Data(Bytes::from_static(b"-No such user\n")));
    type_str(&mut app, "@alice hi");
    app.handle(AppEvent::Key(KeyInput::Enter));
    app.handle(AppEvent::Data(Bytes::from_static(b"+\n")));

    let buffer = draw(&app);

    let (x, y) = find(&buffer, "[09:00 alice]: morning").unwrap();
    assert_eq!(buffer[(x, y)].fg, Color::Yellow);
    let (x, y) = find(&buffer, "-No such user").unwrap();
    assert_eq!(buffer[(x, y)].fg, Color::Red);
    let (x, y) = find(&buffer, "[I (to alice)]: hi").unwrap();
    assert_eq!(buffer[(x, y)].fg, Color::Cyan);
}

#[test]
fn color_change_applies_to_next_draw() {
    let mut app = online_app();
    app.handle(AppEvent::Key(KeyInput::Char('3')));

    let buffer = draw(&app);
    let (x, y) = find(&buffer, "alice <online>").unwrap();
    assert_eq!(buffer[(x, y)].fg, Color::Green);
}

#[test]
fn border_uses_window_color() {
    let buffer = draw(&online_app());
    assert_eq!(buffer[(0, 0)].fg, Color::Magenta);

    let mut app = online_app();
    app.handle(AppEvent::Key(KeyInput::Char('1')));
    let buffer = draw(&app);
    assert_eq!(buffer[(0, 0)].fg, Color::Blue);
}

#[test]
fn input_line_and_cursor() {
    let mut app = online_app();
    type_str(&mut app, "* hello");

    let mut terminal = Terminal::new(TestBackend::new(SCREEN_WIDTH, SCREEN_HEIGHT)).unwrap();
    terminal.draw(|frame| ui::render(frame, &app)).unwrap();

    let buffer = terminal.backend().buffer();
    let (x, y) = find(buffer, "* hello").unwrap();
    assert_eq!((x, y), (1, 27));

    let cursor = terminal.get_cursor_position().unwrap();
    assert_eq!((cursor.x, cursor.y), (1 + 7, 27));
}

#[test]
fn long_input_wraps_at_input_width() {
    let mut app = online_app();
    type_str(&mut app, "* ");
    type_str(&mut app, &"w".repeat(150));

    let buffer = draw(&app);
    let first = row_text(&buffer, 27);
    let second = row_text(&buffer, 28);

    assert_eq!(first.matches('w').count(), 114);
    assert_eq!(second.matches('w').count(), 36);
}

#[test]
fn status_bar_shows_user_and_hints() {
    let buffer = draw(&online_app());
    let status = row_text(&buffer, SCREEN_HEIGHT - 1);

    assert!(status.contains("bob"));
    assert!(status.contains("Esc quit"));
}

#[test]
fn small_terminal_does_not_panic() {
    let app = online_app();
    let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
    terminal.draw(|frame| ui::render(frame, &app)).unwrap();
}
