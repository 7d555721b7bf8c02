//! Deterministic simulation harness for pichat client testing.
//!
//! Runs the real [`pichat_app::Runtime`] against a scripted driver, an
//! in-memory server and a virtual clock, so whole sessions (login, typing,
//! pushed messages, keepalives, disconnects) replay identically every time.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_clock;
pub mod sim_driver;
pub mod sim_server;

pub use invariants::{
    CapacityBound, IdleInputEmpty, InputLimits, Invariant, InvariantRegistry, InvariantResult,
    RowWidth, SessionSnapshot, SingleRequestInFlight, Violation, WindowBounds, WindowHeight,
};
pub use sim_clock::SimInstant;
pub use sim_driver::{SimDriver, SimDriverError, SimHandle, SimStep};
pub use sim_server::SimServer;
