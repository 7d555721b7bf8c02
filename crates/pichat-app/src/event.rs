//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two sources:
//! - The keyboard and terminal (keys, resizes) plus periodic ticks.
//! - The socket (raw chunks, and the login handshake completing).

use bytes::Bytes;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Raw chunk read from the socket.
    Data(Bytes),

    /// Periodic tick (nothing else happened within the poll timeout).
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Login handshake accepted.
    LoggedIn,
}
