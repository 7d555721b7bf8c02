//! Terminal UI for pichat
//!
//! A thin shell over [`pichat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`pichat_app::Runtime`].
//!
//! This crate only handles the terminal, the socket and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use pichat_app::{
    App, AppAction, AppEvent, Credentials, Driver, KeyInput, Runtime, RuntimeError,
};
pub use terminal::{TerminalDriver, TerminalError};
