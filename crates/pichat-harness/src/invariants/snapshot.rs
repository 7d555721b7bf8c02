//! Observable session state for invariant checks.

use pichat_app::{App, InputPhase};

/// Everything the invariants look at, copied out of an [`App`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Buffer capacity in rows.
    pub capacity: usize,
    /// Buffer width in characters.
    pub width: usize,
    /// Window height in rows.
    pub window_height: usize,
    /// Rows stored (the write cursor).
    pub write_cursor: usize,
    /// First visible row.
    pub read_start: usize,
    /// One past the last visible row.
    pub read_end: usize,
    /// Every stored row, oldest first.
    pub rows: Vec<String>,
    /// Rows inside the window.
    pub visible: Vec<String>,
    /// Input phase.
    pub input_phase: InputPhase,
    /// Typed line.
    pub input_line: String,
    /// Typed recipient.
    pub input_name: String,
    /// Typed message.
    pub input_message: String,
    /// Roster entries.
    pub roster: Vec<String>,
    /// Requests awaiting replies, sent or queued.
    pub pending_replies: usize,
    /// Whether a request is on the wire.
    pub request_in_flight: bool,
    /// Requests waiting behind the one in flight.
    pub queued_requests: usize,
}

impl SessionSnapshot {
    /// Capture the state of `app`.
    pub fn from_app(app: &App) -> Self {
        let scrollback = app.scrollback();
        let input = app.input();
        Self {
            capacity: scrollback.capacity(),
            width: scrollback.width(),
            window_height: scrollback.window_height(),
            write_cursor: scrollback.write_cursor(),
            read_start: scrollback.read_start(),
            read_end: scrollback.read_end(),
            rows: scrollback.rows().map(|r| r.text().to_string()).collect(),
            visible: scrollback.visible_rows().iter().map(|r| r.text().to_string()).collect(),
            input_phase: input.phase(),
            input_line: input.line().to_string(),
            input_name: input.name().to_string(),
            input_message: input.message().to_string(),
            roster: app.roster().to_vec(),
            pending_replies: app.pending_replies(),
            request_in_flight: app.request_in_flight(),
            queued_requests: app.queued_requests(),
        }
    }
}
