//! Incoming data: reply classification, chunk decoding and row markers.
//!
//! The server answers each request with one reply whose first byte is a
//! status marker (`-` for errors). Independently it pushes messages from other
//! users as `MSGFROM [<date> <sender>]: <text>` lines. Since the stream has no
//! framing, one socket read may hold several lines; [`decode`] separates pushed
//! messages from the reply text.

use crate::ERROR_SENTINEL;

/// Prefix of a message pushed by the server on behalf of another user.
pub const MESSAGE_PREFIX: &str = "MSGFROM ";

/// Second character of a row the client wrote for its own messages.
pub const OWN_MARKER: char = 'I';

/// Reply classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyClass {
    /// Error or denial (first byte is `-`).
    Error,
    /// Anything else: acknowledgement, roster, pong.
    Info,
}

/// Classify a raw reply. A reply is an error iff its first byte is `-`.
pub fn classify(reply: &[u8]) -> ReplyClass {
    if reply.first() == Some(&ERROR_SENTINEL) { ReplyClass::Error } else { ReplyClass::Info }
}

/// Reply payload without its status marker and trailing padding.
pub fn reply_body(reply: &[u8]) -> &[u8] {
    trim_padding(reply).get(1..).unwrap_or(&[])
}

fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| !matches!(b, b'\0' | b'\n' | b'\r')).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// A reply to one of our requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    raw: String,
}

impl Reply {
    /// Wrap raw reply text. Trailing newlines and NUL padding are dropped.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let raw = raw.trim_end_matches(['\0', '\n', '\r']).to_string();
        Self { raw }
    }

    /// Reply text including the status marker.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Reply classification.
    pub fn class(&self) -> ReplyClass {
        classify(self.raw.as_bytes())
    }

    /// Whether the server reported an error.
    pub fn is_error(&self) -> bool {
        self.class() == ReplyClass::Error
    }

    /// Reply text after the status marker.
    pub fn body(&self) -> &str {
        let mut chars = self.raw.chars();
        chars.next();
        chars.as_str()
    }

    /// Non-empty lines of the body, trimmed. A roster reply has one user per
    /// line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body().lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

/// One decoded unit of incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Message pushed by the server, with [`MESSAGE_PREFIX`] removed.
    Message(String),
    /// Reply to an outstanding request.
    Reply(Reply),
}

/// Decode one socket chunk.
///
/// Pushed messages come first, in order. All other non-empty lines are joined
/// into a single trailing [`Inbound::Reply`]. Invalid UTF-8 is replaced, never
/// rejected.
///
/// Replies carry no framing and may span lines (USERS), so a chunk cannot be
/// split into several replies. Callers keep one request outstanding and treat
/// the reply text of a chunk as its answer.
pub fn decode(chunk: &[u8]) -> Vec<Inbound> {
    let text = String::from_utf8_lossy(chunk);
    let mut inbound = Vec::new();
    let mut reply_lines = Vec::new();

    for line in text.split('\n') {
        let line = line.trim_matches(['\0', '\r']);
        if line.is_empty() {
            continue;
        }
        match line.strip_prefix(MESSAGE_PREFIX) {
            Some(message) => inbound.push(Inbound::Message(message.to_string())),
            None => reply_lines.push(line),
        }
    }

    if !reply_lines.is_empty() {
        inbound.push(Inbound::Reply(Reply::new(reply_lines.join("\n"))));
    }
    inbound
}

/// Who a scrollback row came from, derived from its leading characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    /// Written by this client (`[I (to ...)]: ...`).
    Own,
    /// Pushed from another user (`[2024-... sender]: ...`).
    Other,
    /// Error reply (`-...`). Rendered in a fixed alert color.
    Error,
    /// No recognized marker.
    Plain,
}

impl RowSource {
    /// Classify a row by its marker characters.
    pub fn of(row: &str) -> Self {
        let mut chars = row.chars();
        match (chars.next(), chars.next()) {
            (Some(first), _) if first == char::from(ERROR_SENTINEL) => Self::Error,
            (_, Some(OWN_MARKER)) => Self::Own,
            (_, Some(second)) if second.is_ascii_digit() => Self::Other,
            _ => Self::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_dash_is_error() {
        assert_eq!(classify(b"-No such user"), ReplyClass::Error);
        assert_eq!(classify(b"+"), ReplyClass::Info);
        assert_eq!(classify(b""), ReplyClass::Info);
        assert_eq!(classify(b" -late dash"), ReplyClass::Info);
    }

    #[test]
    fn body_strips_marker_and_padding() {
        assert_eq!(reply_body(b"+alice\nbob\n\0\0"), b"alice\nbob");
        assert_eq!(reply_body(b"+\n"), b"");
        assert_eq!(reply_body(b""), b"");
    }

    #[test]
    fn reply_lines_skip_blanks() {
        let reply = Reply::new("+alice (you) *\n\nbob\n");
        assert_eq!(reply.lines().collect::<Vec<_>>(), vec!["alice (you) *", "bob"]);
        assert!(!reply.is_error());
    }

    #[test]
    fn reply_body_handles_multibyte_marker() {
        let reply = Reply::new("ёbody");
        assert_eq!(reply.body(), "body");
    }

    #[test]
    fn decode_separates_pushed_messages() {
        let chunk = b"MSGFROM [2024-05-01 10:00:00 bob]: hey\n+\n";
        let inbound = decode(chunk);

        assert_eq!(inbound, vec![
            Inbound::Message("[2024-05-01 10:00:00 bob]: hey".into()),
            Inbound::Reply(Reply::new("+")),
        ]);
    }

    #[test]
    fn decode_keeps_multiline_reply_together() {
        let inbound = decode(b"+alice\nbob\n");
        assert_eq!(inbound, vec![Inbound::Reply(Reply::new("+alice\nbob"))]);
    }

    #[test]
    fn decode_empty_chunk() {
        assert!(decode(b"").is_empty());
        assert!(decode(b"\0\0\n").is_empty());
    }

    #[test]
    fn row_sources() {
        assert_eq!(RowSource::of("[I (to alice)]: hi"), RowSource::Own);
        assert_eq!(RowSource::of("[2024-05-01 10:00:00 bob]: hey"), RowSource::Other);
        assert_eq!(RowSource::of("-No such user"), RowSource::Error);
        assert_eq!(RowSource::of("-I look like mine"), RowSource::Error);
        assert_eq!(RowSource::of("Bye"), RowSource::Plain);
        assert_eq!(RowSource::of(""), RowSource::Plain);
    }
}
