//! Outgoing requests.
//!
//! Every request is one line: a command name followed by `|key=value` pairs.
//! Values are written verbatim. There is no escaping, so a value containing
//! `|` or `=` changes how the server splits the line; [`Request::validate`]
//! reports that without altering the encoding.

use std::fmt;

use crate::errors::{ProtocolError, Result};

/// Characters the server uses to split a request line.
const RESERVED: [char; 2] = ['|', '='];

/// `LOGIN|username=<u>|password=<p>`
pub fn encode_login(username: &str, password: &str) -> String {
    format!("LOGIN|username={username}|password={password}")
}

/// `SEND|username=<u>|msg=<m>`
pub fn encode_direct(username: &str, message: &str) -> String {
    format!("SEND|username={username}|msg={message}")
}

/// `SNDALL|msg=<m>`
pub fn encode_broadcast(message: &str) -> String {
    format!("SNDALL|msg={message}")
}

/// `PING`
pub fn encode_ping() -> String {
    String::from("PING")
}

/// `USERS`
pub fn encode_users_query() -> String {
    String::from("USERS")
}

/// A request the client can send.
#[derive(Clone, PartialEq, Eq)]
pub enum Request {
    /// Authenticate (or register on first use).
    Login {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },

    /// Message to a single user.
    Direct {
        /// Recipient account name.
        username: String,
        /// Message text.
        message: String,
    },

    /// Message to every connected user.
    Broadcast {
        /// Message text.
        message: String,
    },

    /// Keepalive.
    Ping,

    /// Roster query.
    Users,
}

impl Request {
    /// Command name on the wire.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Login { .. } => "LOGIN",
            Self::Direct { .. } => "SEND",
            Self::Broadcast { .. } => "SNDALL",
            Self::Ping => "PING",
            Self::Users => "USERS",
        }
    }

    /// Encode as a request line.
    pub fn encode(&self) -> String {
        match self {
            Self::Login { username, password } => encode_login(username, password),
            Self::Direct { username, message } => encode_direct(username, message),
            Self::Broadcast { message } => encode_broadcast(message),
            Self::Ping => encode_ping(),
            Self::Users => encode_users_query(),
        }
    }

    /// Check that no field value contains a reserved delimiter.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if let Some(delimiter) = value.chars().find(|c| RESERVED.contains(c)) {
                return Err(ProtocolError::ReservedDelimiter { field, delimiter });
            }
        }
        Ok(())
    }

    fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Login { username, password } => {
                vec![("username", username.as_str()), ("password", password.as_str())]
            },
            Self::Direct { username, message } => {
                vec![("username", username.as_str()), ("msg", message.as_str())]
            },
            Self::Broadcast { message } => vec![("msg", message.as_str())],
            Self::Ping | Self::Users => Vec::new(),
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Direct { username, message } => f
                .debug_struct("Direct")
                .field("username", username)
                .field("message", message)
                .finish(),
            Self::Broadcast { message } => {
                f.debug_struct("Broadcast").field("message", message).finish()
            },
            Self::Ping => f.write_str("Ping"),
            Self::Users => f.write_str("Users"),
        }
    }
}
