//! Application layer for pichat
//!
//! Pure state machines and a generic runtime for the chat client, so the same
//! orchestration code runs against a real terminal and socket in production
//! and against a scripted driver in simulation.
//!
//! # Components
//!
//! - [`Scrollback`]: bounded buffer of rendered chat rows with a scroll window
//! - [`InputState`]: command-line state machine (`*` broadcast, `@` direct)
//! - [`App`]: session aggregate (scrollback, input, palette, roster, pending
//!   replies)
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: login handshake, event loop and keepalive timing

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod heartbeat;
pub mod input;
mod palette;
mod runtime;
pub mod scrollback;
mod state;

pub use action::AppAction;
pub use app::App;
pub use driver::Driver;
pub use event::AppEvent;
pub use heartbeat::{HEARTBEAT_INTERVAL, Heartbeat};
pub use input::{
    CommandKind, InputCursor, InputOutcome, InputPhase, InputState, KeyInput, Submission,
    Utf8Assembler,
};
pub use palette::{AnsiColor, Palette, PaletteSlot};
pub use runtime::{Runtime, RuntimeError};
pub use scrollback::{Row, Scrollback};
pub use state::{Credentials, Redraw, SessionState};
