//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the interactive
//! state of one chat session, decoupled from the terminal and the socket.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Feeds keys to the [`InputState`] and turns committed lines into requests.
//! - Handles the idle-only shortcuts: colors, scrolling.
//! - Keeps one request on the wire at a time; later ones wait in a queue
//!   until the reply to the current one has been handled.
//! - Appends pushed messages and reply rows to the [`Scrollback`].
//! - Keeps the roster from the latest USERS reply.

use std::collections::VecDeque;

use pichat_proto::{Inbound, OWN_MARKER, Reply, Request, decode};

use crate::{
    AppAction, AppEvent, InputOutcome, InputState, KeyInput, Palette, PaletteSlot, Redraw,
    Scrollback, SessionState, Submission, state::PendingReply,
};

/// Row appended after a direct message is accepted.
fn own_row(to: &str, message: &str) -> String {
    format!("[{OWN_MARKER} (to {to})]: {message}")
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Logged-in account.
    username: String,
    /// Session lifecycle.
    state: SessionState,
    /// Chat history.
    scrollback: Scrollback,
    /// Command line being typed.
    input: InputState,
    /// Adjustable colors.
    palette: Palette,
    /// Roster lines from the latest USERS reply.
    roster: Vec<String>,
    /// Request on the wire, waiting for its reply.
    in_flight: Option<PendingReply>,
    /// Requests waiting for `in_flight` to be answered, oldest first.
    queued: VecDeque<Request>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create an App for the given account, before login completes.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            state: SessionState::LoggingIn,
            scrollback: Scrollback::new(),
            input: InputState::new(),
            palette: Palette::default(),
            roster: Vec::new(),
            in_flight: None,
            queued: VecDeque::new(),
            terminal_size: (120, 30),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render(Redraw::Full)]
            },
            AppEvent::LoggedIn => {
                self.state = SessionState::Online;
                self.status_message = Some(format!("Logged in as {}", self.username));
                let mut actions = vec![AppAction::Render(Redraw::Full)];
                actions.extend(self.request(Request::Users));
                actions
            },
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Data(chunk) => self.handle_data(&chunk),
        }
    }

    /// Keepalive request, for the runtime's idle timer.
    ///
    /// Nothing is sent while another request is outstanding.
    pub fn ping(&mut self) -> Vec<AppAction> {
        if self.in_flight.is_some() {
            return vec![];
        }
        self.request(Request::Ping).into_iter().collect()
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => vec![AppAction::Quit],
            KeyInput::Tab => {
                self.scrollback.clear();
                let mut actions = vec![AppAction::Render(Redraw::Full)];
                actions.extend(self.request(Request::Users));
                actions
            },
            KeyInput::Up => self.scroll(Scrollback::scroll_up),
            KeyInput::Down => self.scroll(Scrollback::scroll_down),
            KeyInput::Enter => {
                let outcome = self.input.commit();
                self.apply_input(outcome)
            },
            KeyInput::Backspace => {
                let outcome = self.input.backspace();
                self.apply_input(outcome)
            },
            KeyInput::Byte(byte) => match self.input.assemble(byte) {
                Some(c) => self.handle_char(c),
                None => vec![],
            },
            KeyInput::Char(c) => self.handle_char(c),
        }
    }

    fn handle_char(&mut self, c: char) -> Vec<AppAction> {
        if self.input.is_idle()
            && let Some(actions) = self.shortcut(c)
        {
            return actions;
        }
        let outcome = self.input.push_char(c);
        self.apply_input(outcome)
    }

    /// Shortcuts only fire while nothing is typed.
    fn shortcut(&mut self, c: char) -> Option<Vec<AppAction>> {
        let slot = match c {
            '1' => PaletteSlot::Window,
            '2' => PaletteSlot::Own,
            '3' => PaletteSlot::Other,
            '-' => return Some(self.scroll(Scrollback::scroll_up)),
            '+' => return Some(self.scroll(Scrollback::scroll_down)),
            _ => return None,
        };
        self.palette.cycle(slot);
        let mut actions = vec![AppAction::Render(Redraw::Full)];
        actions.extend(self.request(Request::Users));
        Some(actions)
    }

    fn scroll(&mut self, step: fn(&mut Scrollback) -> bool) -> Vec<AppAction> {
        if step(&mut self.scrollback) { vec![AppAction::Render(Redraw::Messages)] } else { vec![] }
    }

    fn apply_input(&mut self, outcome: InputOutcome) -> Vec<AppAction> {
        match outcome {
            InputOutcome::Unchanged => vec![],
            InputOutcome::Edited | InputOutcome::Rejected | InputOutcome::Abandoned => {
                vec![AppAction::Render(Redraw::Input)]
            },
            InputOutcome::NoRecipient => {
                self.status_message = Some("No previous recipient; start with @name".to_string());
                vec![AppAction::Render(Redraw::Input)]
            },
            InputOutcome::Committed(submission) => {
                let request = match submission {
                    Submission::Broadcast { message } => Request::Broadcast { message },
                    Submission::Direct { to, message } => Request::Direct { username: to, message },
                };
                let mut actions: Vec<_> = self.request(request).into_iter().collect();
                actions.push(AppAction::Render(Redraw::Input));
                actions
            },
        }
    }

    /// Queue a request and send it if nothing else is outstanding.
    fn request(&mut self, request: Request) -> Option<AppAction> {
        self.enqueue(request);
        self.dispatch_next()
    }

    fn enqueue(&mut self, request: Request) {
        if let Err(e) = request.validate() {
            tracing::warn!(command = request.command(), "sending unescaped delimiter: {e}");
            self.status_message = Some(format!("Warning: {e}"));
        }

        // One queued roster query answers every refresh asked for meanwhile
        if request == Request::Users && self.queued.contains(&Request::Users) {
            return;
        }
        self.queued.push_back(request);
    }

    /// Put the oldest queued request on the wire once the previous one has
    /// been answered.
    fn dispatch_next(&mut self) -> Option<AppAction> {
        if self.in_flight.is_some() {
            return None;
        }
        let request = self.queued.pop_front()?;
        self.in_flight = PendingReply::for_request(&request);
        Some(AppAction::Send(request))
    }

    fn handle_data(&mut self, chunk: &[u8]) -> Vec<AppAction> {
        let mut messages_changed = false;
        let mut roster_changed = false;
        let mut pushed = false;

        for inbound in decode(chunk) {
            match inbound {
                Inbound::Message(text) => {
                    tracing::debug!("pushed message");
                    self.scrollback.append_wrapped(&text);
                    messages_changed = true;
                    pushed = true;
                },
                Inbound::Reply(reply) => match self.handle_reply(reply) {
                    Some(Redraw::Roster) => roster_changed = true,
                    Some(_) => messages_changed = true,
                    None => {},
                },
            }
        }

        let mut actions = Vec::new();
        if messages_changed {
            self.scrollback.follow_tail();
            actions.push(AppAction::Render(Redraw::Messages));
        }
        if roster_changed {
            actions.push(AppAction::Render(Redraw::Roster));
        }
        if pushed {
            self.enqueue(Request::Users);
        }
        actions.extend(self.dispatch_next());
        actions
    }

    /// Apply one reply to the request in flight. Returns the region it
    /// changed.
    fn handle_reply(&mut self, reply: Reply) -> Option<Redraw> {
        let pending = self.in_flight.take();
        tracing::trace!(?pending, error = reply.is_error(), "reply");

        match pending {
            Some(PendingReply::Direct { to, message }) => {
                if reply.is_error() {
                    self.scrollback.append_wrapped(reply.raw());
                } else {
                    self.scrollback.append_wrapped(&own_row(&to, &message));
                }
                Some(Redraw::Messages)
            },
            Some(PendingReply::Roster) if !reply.is_error() => {
                self.roster = reply.lines().map(str::to_string).collect();
                Some(Redraw::Roster)
            },
            Some(PendingReply::Roster | PendingReply::Broadcast | PendingReply::Ping) | None => {
                if !reply.is_error() && reply.body().trim().is_empty() {
                    return None;
                }
                self.scrollback.append_wrapped(reply.raw());
                Some(Redraw::Messages)
            },
        }
    }

    /// Logged-in account.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Session lifecycle.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Chat history.
    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Command line being typed.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Current colors.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Roster lines from the latest USERS reply.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Number of requests still waiting for a reply, sent or queued.
    pub fn pending_replies(&self) -> usize {
        usize::from(self.in_flight.is_some()) + self.queued.len()
    }

    /// Whether a request is on the wire.
    pub fn request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of requests waiting behind the one in flight.
    pub fn queued_requests(&self) -> usize {
        self.queued.len()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use pichat_proto::RowSource;

    use super::*;
    use crate::AnsiColor;

    fn online() -> App {
        let mut app = App::new("bob");
        app.handle(AppEvent::LoggedIn);
        app.handle(AppEvent::Data(Bytes::from_static(b"+bob (you) <online>\n")));
        app
    }

    fn type_line(app: &mut App, line: &str) -> Vec<AppAction> {
        for c in line.chars() {
            app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
        app.handle(AppEvent::Key(KeyInput::Enter))
    }

    fn sent(actions: &[AppAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                AppAction::Send(request) => Some(request.encode()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn login_requests_roster() {
        let mut app = App::new("bob");
        let actions = app.handle(AppEvent::LoggedIn);

        assert_eq!(app.state(), SessionState::Online);
        assert_eq!(actions[0], AppAction::Render(Redraw::Full));
        assert_eq!(sent(&actions), vec!["USERS"]);
    }

    #[test]
    fn roster_reply_replaces_roster() {
        let app = online();
        assert_eq!(app.roster(), &["bob (you) <online>".to_string()]);
        assert_eq!(app.pending_replies(), 0);
    }

    #[test]
    fn broadcast_commit_sends_once() {
        let mut app = online();
        let actions = type_line(&mut app, "* hello");

        assert_eq!(sent(&actions), vec!["SNDALL|msg=hello"]);
        assert!(app.input().is_idle());

        let actions = app.handle(AppEvent::Data(Bytes::from_static(b"+\n")));
        assert!(actions.is_empty());
        assert!(app.scrollback().is_empty());
    }

    #[test]
    fn direct_success_appends_own_row() {
        let mut app = online();
        let actions = type_line(&mut app, "@alice hi");
        assert_eq!(sent(&actions), vec!["SEND|username=alice|msg=hi"]);

        let actions = app.handle(AppEvent::Data(Bytes::from_static(b"+\n")));
        assert_eq!(actions, vec![AppAction::Render(Redraw::Messages)]);

        let row = app.scrollback().rows().last().map(|r| (r.text().to_string(), r.source()));
        assert_eq!(row, Some(("[I (to alice)]: hi".to_string(), RowSource::Own)));
    }

    #[test]
    fn direct_error_appends_raw_reply() {
        let mut app = online();
        type_line(&mut app, "@carol hi");
        app.handle(AppEvent::Data(Bytes::from_static(b"-No such user\n")));

        let rows: Vec<_> = app.scrollback().rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(), "-No such user");
        assert_eq!(rows[0].source(), RowSource::Error);
    }

    #[test]
    fn reuse_sends_to_saved_name() {
        let mut app = online();
        type_line(&mut app, "@alice hi");
        app.handle(AppEvent::Data(Bytes::from_static(b"+\n")));

        let actions = type_line(&mut app, "@ bye");
        assert_eq!(sent(&actions), vec!["SEND|username=alice|msg=bye"]);
    }

    #[test]
    fn reuse_without_saved_name_sends_nothing() {
        let mut app = online();
        let actions = type_line(&mut app, "@ bye");

        assert!(sent(&actions).is_empty());
        assert!(app.status_message().is_some());
    }

    #[test]
    fn pushed_message_appends_and_refreshes_roster() {
        let mut app = online();
        let actions =
            app.handle(AppEvent::Data(Bytes::from_static(b"MSGFROM [12:00 alice]: hey\n")));

        assert_eq!(app.scrollback().rows().next().map(|r| r.text()), Some("[12:00 alice]: hey"));
        assert!(actions.contains(&AppAction::Render(Redraw::Messages)));
        assert_eq!(sent(&actions), vec!["USERS"]);
    }

    #[test]
    fn shortcuts_only_when_idle() {
        let mut app = online();
        let actions = app.handle(AppEvent::Key(KeyInput::Char('2')));
        assert_eq!(app.palette().own, AnsiColor::Magenta);
        assert_eq!(sent(&actions), vec!["USERS"]);

        app.handle(AppEvent::Key(KeyInput::Char('*')));
        app.handle(AppEvent::Key(KeyInput::Char(' ')));
        app.handle(AppEvent::Key(KeyInput::Char('2')));
        assert_eq!(app.palette().own, AnsiColor::Magenta);
        assert_eq!(app.input().message(), "2");
    }

    #[test]
    fn tab_clears_history() {
        let mut app = online();
        app.handle(AppEvent::Data(Bytes::from_static(b"MSGFROM [12:00 alice]: hey\n")));

        let actions = app.handle(AppEvent::Key(KeyInput::Tab));
        assert!(app.scrollback().is_empty());
        assert_eq!(actions[0], AppAction::Render(Redraw::Full));
    }

    #[test]
    fn escape_quits_mid_line() {
        let mut app = online();
        app.handle(AppEvent::Key(KeyInput::Char('@')));
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
    }

    #[test]
    fn scroll_keys() {
        let mut app = online();
        for i in 0..30 {
            let chunk = format!("MSGFROM [12:00 alice]: {i}\n");
            app.handle(AppEvent::Data(Bytes::from(chunk)));
        }
        let start = app.scrollback().read_start();

        let actions = app.handle(AppEvent::Key(KeyInput::Char('-')));
        assert_eq!(actions, vec![AppAction::Render(Redraw::Messages)]);
        assert_eq!(app.scrollback().read_start(), start - 1);

        app.handle(AppEvent::Key(KeyInput::Down));
        assert_eq!(app.scrollback().read_start(), start);
        assert!(app.handle(AppEvent::Key(KeyInput::Char('+'))).is_empty());
    }

    #[test]
    fn second_request_waits_for_first_reply() {
        let mut app = online();
        assert_eq!(sent(&app.handle(AppEvent::Key(KeyInput::Char('1')))), vec!["USERS"]);
        assert!(sent(&app.handle(AppEvent::Key(KeyInput::Char('1')))).is_empty());
        assert!(sent(&type_line(&mut app, "@alice hi")).is_empty());
        assert_eq!(app.pending_replies(), 3);

        let actions = app.handle(AppEvent::Data(Bytes::from_static(b"+alice\nbob\n")));
        assert_eq!(sent(&actions), vec!["USERS"]);
        assert_eq!(app.roster(), &["alice".to_string(), "bob".to_string()]);

        let actions = app.handle(AppEvent::Data(Bytes::from_static(b"+alice\nbob\n")));
        assert_eq!(sent(&actions), vec!["SEND|username=alice|msg=hi"]);

        app.handle(AppEvent::Data(Bytes::from_static(b"+\n")));
        let rows: Vec<_> = app.scrollback().rows().map(|r| r.text().to_string()).collect();
        assert_eq!(rows, vec!["[I (to alice)]: hi"]);
        assert_eq!(app.roster().len(), 2);
        assert_eq!(app.pending_replies(), 0);
    }

    #[test]
    fn queued_roster_refreshes_collapse() {
        let mut app = online();
        type_line(&mut app, "* hello");
        for _ in 0..3 {
            app.handle(AppEvent::Data(Bytes::from_static(b"MSGFROM [12:00 alice]: hey\n")));
        }

        assert!(app.request_in_flight());
        assert_eq!(app.queued_requests(), 1);
    }

    #[test]
    fn keepalive_skipped_while_busy() {
        let mut app = online();
        type_line(&mut app, "@alice hi");

        assert!(app.ping().is_empty());
        app.handle(AppEvent::Data(Bytes::from_static(b"+\n")));
        assert_eq!(sent(&app.ping()), vec!["PING"]);
    }

    #[test]
    fn delimiter_in_message_warns_but_sends() {
        let mut app = online();
        let actions = type_line(&mut app, "* a|b");

        assert_eq!(sent(&actions), vec!["SNDALL|msg=a|b"]);
        assert!(app.status_message().is_some_and(|s| s.starts_with("Warning")));
    }
}
