//! Session state types.

use std::fmt;

use pichat_proto::Request;

/// Session lifecycle as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the login reply.
    LoggingIn,
    /// Login accepted; the main loop is running.
    Online,
}

/// Screen region to repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Everything, starting from a cleared screen.
    Full,
    /// Message pane.
    Messages,
    /// Roster pane.
    Roster,
    /// Input area (and the status line under it).
    Input,
}

/// Login credentials. `Debug` output never includes the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Account name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The LOGIN request for these credentials.
    pub fn login_request(&self) -> Request {
        Request::Login { username: self.username.clone(), password: self.password.clone() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The request on the wire, waiting for its reply.
///
/// Replies carry no request id and no framing, so only one request is
/// outstanding at a time and whatever arrives next answers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingReply {
    /// Direct message; the reply decides between an own row and an error row.
    Direct { to: String, message: String },
    /// Broadcast acknowledgement.
    Broadcast,
    /// Keepalive acknowledgement.
    Ping,
    /// Roster listing.
    Roster,
}

impl PendingReply {
    /// Reply expectation for `request`. LOGIN is answered inside the
    /// handshake and never waits here.
    pub(crate) fn for_request(request: &Request) -> Option<Self> {
        match request {
            Request::Direct { username, message } => {
                Some(Self::Direct { to: username.clone(), message: message.clone() })
            },
            Request::Broadcast { .. } => Some(Self::Broadcast),
            Request::Ping => Some(Self::Ping),
            Request::Users => Some(Self::Roster),
            Request::Login { .. } => None,
        }
    }
}
