//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use bytes::Bytes;

use crate::{App, AppEvent, Redraw};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, a tokio TCP socket for transport
/// - **Simulation**: scripted keys, an in-memory server and a virtual clock
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Wait briefly for the next keyboard, terminal or socket event.
    ///
    /// Returns `None` if nothing happened before the driver's poll timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails or the connection is lost.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Send one protocol line to the server. The driver adds no terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or send fails.
    fn send_line(&mut self, line: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Block until the server sends the next chunk. Used only for the login
    /// handshake, before the main loop starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection closes first.
    fn recv_reply(&mut self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Repaint one region of the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App, region: Redraw) -> Result<(), Self::Error>;

    /// Stop the connection and restore the terminal.
    fn stop(&mut self);
}
