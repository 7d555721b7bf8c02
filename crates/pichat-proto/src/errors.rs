//! Protocol errors.

use thiserror::Error;

/// Errors raised while checking outgoing requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A field value contains a character the server treats as a delimiter.
    ///
    /// The request is still encoded verbatim; the server will split it at the
    /// delimiter.
    #[error("field `{field}` contains reserved delimiter {delimiter:?}")]
    ReservedDelimiter {
        /// Field name as it appears on the wire.
        field: &'static str,
        /// First offending character.
        delimiter: char,
    },
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
