//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use pichat_proto::Request;

use crate::Redraw;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Repaint part of the UI.
    Render(Redraw),

    /// Send a request to the server.
    Send(Request),

    /// Quit the application.
    Quit,
}
