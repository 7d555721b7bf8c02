//! Wire codec for the pichat chat protocol.
//!
//! The protocol is line-oriented ASCII over a TCP stream with no explicit
//! framing:
//!
//! - Requests are `COMMAND|key=value|...` lines built by [`Request`].
//! - Replies carry a one-byte status marker; `-` marks an error.
//! - The server also pushes `MSGFROM [...]: text` lines from other users.
//!
//! Everything here is pure encode/decode. The optional `transport` feature
//! adds a tokio TCP transport that moves raw lines and chunks over channels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod reply;
pub mod request;
#[cfg(feature = "transport")]
pub mod transport;

pub use errors::{ProtocolError, Result};
pub use reply::{
    Inbound, MESSAGE_PREFIX, OWN_MARKER, Reply, ReplyClass, RowSource, classify, decode,
    reply_body,
};
pub use request::{
    Request, encode_broadcast, encode_direct, encode_login, encode_ping, encode_users_query,
};

/// First byte of every error reply.
pub const ERROR_SENTINEL: u8 = b'-';

/// Largest chunk read from the socket in one go.
pub const MAX_REPLY_SIZE: usize = 256;
