//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Network uses the tokio TCP
//! transport from `pichat-proto`.

use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use bytes::Bytes;
use crossterm::{
    ExecutableCommand,
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use pichat_app::{App, AppEvent, Driver, KeyInput, Redraw};
use pichat_proto::transport::{self, ConnectedClient, TransportError};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui;

/// How long one poll waits before reporting a tick.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Modifiers that turn a character key into a chord.
const CHORD_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::ALT);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel send error.
    #[error("channel send error")]
    ChannelSend,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the TCP
/// connection. The terminal is restored when the driver is dropped.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    connection: ConnectedClient,
}

impl TerminalDriver {
    /// Connect to the server, then take over the terminal.
    ///
    /// The connection is made first so a refused connection is reported on
    /// a normal terminal.
    pub async fn connect(server_addr: &str) -> Result<Self, TerminalError> {
        let connection = transport::connect(server_addr).await?;

        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, connection })
    }

    /// Convert a crossterm key event to `KeyInput`.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(KeyInput::Esc)
            },
            // Other chords are not text
            KeyCode::Char(_) if key.modifiers.intersects(CHORD_MODIFIERS) => None,
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key_event).map(AppEvent::Key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(None),
                }
            }

            // Socket chunks
            maybe_chunk = self.connection.from_server.recv() => {
                match maybe_chunk {
                    Some(chunk) => Ok(Some(AppEvent::Data(chunk))),
                    None => Err(TerminalError::Transport(TransportError::Closed)),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(POLL_TIMEOUT) => {
                Ok(Some(AppEvent::Tick))
            }
        }
    }

    async fn send_line(&mut self, line: String) -> Result<(), Self::Error> {
        self.connection.to_server.send(line).await.map_err(|_| TerminalError::ChannelSend)
    }

    async fn recv_reply(&mut self) -> Result<Bytes, Self::Error> {
        self.connection
            .from_server
            .recv()
            .await
            .ok_or(TerminalError::Transport(TransportError::Closed))
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App, region: Redraw) -> Result<(), Self::Error> {
        tracing::trace!(?region, "render");
        if region == Redraw::Full {
            self.terminal.clear()?;
        }
        self.terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.connection.stop();
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        // Restoring twice is harmless; `stop` may already have run
        self.connection.stop();
        restore_terminal();
    }
}

/// Leave raw mode and the alternate screen and show the cursor.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = stdout().execute(Show);
}
