//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`pichat_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input comes from a script of [`SimStep`]s. Request lines are answered by an
//! attached [`SimServer`] (or by chunks queued up front), and time only moves
//! when the script waits or the session idles.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use bytes::Bytes;
use pichat_app::{App, AppEvent, Driver, KeyInput, Redraw};
use thiserror::Error;

use crate::{
    SimInstant, SimServer,
    invariants::{InvariantRegistry, SessionSnapshot},
};

/// Virtual time that passes per idle poll, matching the terminal's tick.
pub const POLL_STEP: Duration = Duration::from_millis(100);

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
pub enum SimDriverError {
    /// The handshake waited for a reply nobody queued.
    #[error("no reply queued")]
    NoReply,

    /// The script dropped the connection.
    #[error("connection closed")]
    Closed,
}

/// One scripted step.
#[derive(Debug, Clone)]
pub enum SimStep {
    /// A key press.
    Key(KeyInput),
    /// A raw chunk from the server.
    Push(Bytes),
    /// Let virtual time pass, one poll step at a time.
    Wait(Duration),
    /// Drop the connection.
    Disconnect,
}

/// Shared state for script injection and inspection.
///
/// The driver moves into the runtime; tests keep a [`SimHandle`] to the same
/// state.
#[derive(Default)]
struct SharedState {
    script: VecDeque<SimStep>,
    inbound: VecDeque<Bytes>,
    sent: Vec<String>,
    renders: Vec<Redraw>,
    now: SimInstant,
    waiting: Duration,
    idle_budget: Duration,
    server: Option<SimServer>,
    last_snapshot: Option<SessionSnapshot>,
    stopped: bool,
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`pichat_app::Runtime`]
/// orchestration code runs in both the terminal client and simulation tests.
/// Once the script is exhausted and the idle budget spent, the driver presses
/// Escape so every session ends.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<InvariantRegistry>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver with an empty script.
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(SharedState::default())), invariants: None }
    }

    /// Answer every sent line with `server`.
    #[must_use]
    pub fn with_server(self, server: SimServer) -> Self {
        lock(&self.state).server = Some(server);
        self
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Let `budget` of virtual time pass idle after the script ends.
    #[must_use]
    pub fn with_idle_budget(self, budget: Duration) -> Self {
        lock(&self.state).idle_budget = budget;
        self
    }

    /// Append a step to the script.
    pub fn push_step(&self, step: SimStep) {
        lock(&self.state).script.push_back(step);
    }

    /// Append key presses for every character of `text`.
    pub fn type_text(&self, text: &str) {
        let mut state = lock(&self.state);
        state.script.extend(text.chars().map(|c| SimStep::Key(KeyInput::Char(c))));
    }

    /// Append a line of text followed by Enter.
    pub fn type_line(&self, text: &str) {
        self.type_text(text);
        self.push_step(SimStep::Key(KeyInput::Enter));
    }

    /// Queue a chunk as if the server had already sent it.
    pub fn inject_chunk(&self, chunk: Bytes) {
        lock(&self.state).inbound.push_back(chunk);
    }

    /// Handle to the shared state, for inspection after the driver moves.
    pub fn handle(&self) -> SimHandle {
        SimHandle { state: Arc::clone(&self.state) }
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            let snapshot = SessionSnapshot::from_app(app);
            registry.assert_all(&snapshot, context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let mut state = lock(&self.state);

        if let Some(chunk) = state.inbound.pop_front() {
            return Ok(Some(AppEvent::Data(chunk)));
        }

        if !state.waiting.is_zero() {
            let step = state.waiting.min(POLL_STEP);
            state.waiting -= step;
            state.now = state.now.advance(step);
            return Ok(Some(AppEvent::Tick));
        }

        match state.script.pop_front() {
            Some(SimStep::Key(key)) => Ok(Some(AppEvent::Key(key))),
            Some(SimStep::Push(chunk)) => Ok(Some(AppEvent::Data(chunk))),
            Some(SimStep::Wait(duration)) => {
                state.waiting = duration;
                Ok(None)
            },
            Some(SimStep::Disconnect) => Err(SimDriverError::Closed),
            None if !state.idle_budget.is_zero() => {
                let step = state.idle_budget.min(POLL_STEP);
                state.idle_budget -= step;
                state.now = state.now.advance(step);
                Ok(Some(AppEvent::Tick))
            },
            None => Ok(Some(AppEvent::Key(KeyInput::Esc))),
        }
    }

    async fn send_line(&mut self, line: String) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        if let Some(reply) = state.server.as_mut().map(|server| server.handle_line(&line)) {
            state.inbound.push_back(reply);
        }
        state.sent.push(line);
        Ok(())
    }

    async fn recv_reply(&mut self) -> Result<Bytes, Self::Error> {
        lock(&self.state).inbound.pop_front().ok_or(SimDriverError::NoReply)
    }

    fn now(&self) -> Self::Instant {
        lock(&self.state).now
    }

    fn render(&mut self, app: &App, region: Redraw) -> Result<(), Self::Error> {
        self.check_invariants(app, &format!("after {region:?} render"));
        let mut state = lock(&self.state);
        state.renders.push(region);
        state.last_snapshot = Some(SessionSnapshot::from_app(app));
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.state).stopped = true;
    }
}

/// Inspection handle sharing a [`SimDriver`]'s state.
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
}

impl SimHandle {
    /// Every line sent so far, in order.
    pub fn sent(&self) -> Vec<String> {
        lock(&self.state).sent.clone()
    }

    /// Lines sent that start with `command`.
    pub fn sent_commands(&self, command: &str) -> Vec<String> {
        lock(&self.state)
            .sent
            .iter()
            .filter(|line| line.split('|').next() == Some(command))
            .cloned()
            .collect()
    }

    /// Every render request so far, in order.
    pub fn renders(&self) -> Vec<Redraw> {
        lock(&self.state).renders.clone()
    }

    /// App state captured at the latest render.
    pub fn last_snapshot(&self) -> Option<SessionSnapshot> {
        lock(&self.state).last_snapshot.clone()
    }

    /// Current virtual time.
    pub fn now(&self) -> SimInstant {
        lock(&self.state).now
    }

    /// Whether the runtime stopped the driver.
    pub fn stopped(&self) -> bool {
        lock(&self.state).stopped
    }

    /// Inspect the attached server.
    pub fn with_server<T>(&self, f: impl FnOnce(&SimServer) -> T) -> Option<T> {
        lock(&self.state).server.as_ref().map(f)
    }
}
