//! Keyboard input and the command-line state machine.
//!
//! A line is either `* message` (broadcast) or `@name message` (direct).
//! `@ message` reuses the last recipient a direct message was committed to.
//! The machine tracks the rendered line alongside the parsed name and message
//! so backspace can step back across the separators.

/// Longest recipient name, in characters.
pub const NAME_MAX_CHARS: usize = 20;

/// Longest message body, in bytes.
pub const MESSAGE_MAX_BYTES: usize = 256;

/// Longest input line, in rendered units (prefix and name included).
pub const LINE_MAX_UNITS: usize = 232;

/// Units per row of the input area.
pub const INPUT_COLUMNS: usize = 116;

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries, enabling
/// deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Raw byte from a byte-oriented source. Multi-byte characters are
    /// reassembled before they reach the line.
    Byte(u8),
    /// Enter/Return key (commit the line).
    Enter,
    /// Backspace key.
    Backspace,
    /// Tab key (full redraw).
    Tab,
    /// Escape key (quit).
    Esc,
    /// Up arrow key (scroll back).
    Up,
    /// Down arrow key (scroll forward).
    Down,
}

/// Which command the line prefix selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `*`: message to every online user.
    Broadcast,
    /// `@`: message to one user.
    Direct,
}

impl CommandKind {
    /// Parse a command prefix character.
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            '*' => Some(Self::Broadcast),
            '@' => Some(Self::Direct),
            _ => None,
        }
    }

    /// The prefix character for this command.
    pub fn prefix(self) -> char {
        match self {
            Self::Broadcast => '*',
            Self::Direct => '@',
        }
    }
}

/// Where the machine is within the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPhase {
    /// Nothing typed.
    #[default]
    Idle,
    /// Prefix typed, waiting for the character that follows it.
    CommandSelect(CommandKind),
    /// Typing a recipient name after `@`.
    CapturingName,
    /// Typing the message body.
    CapturingMessage(CommandKind),
}

/// A committed line, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Message for every online user.
    Broadcast {
        /// Message body.
        message: String,
    },
    /// Message for one user.
    Direct {
        /// Recipient.
        to: String,
        /// Message body.
        message: String,
    },
}

/// Result of feeding one unit to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Unit ignored; the line did not change.
    Unchanged,
    /// Line changed.
    Edited,
    /// Malformed prefix; the line was cleared.
    Rejected,
    /// Line committed.
    Committed(Submission),
    /// Line committed with an empty message; cleared without sending.
    Abandoned,
    /// `@ message` with no earlier recipient; cleared without sending.
    NoRecipient,
}

/// Position of the input cursor, relative to the input area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputCursor {
    /// Row within the input area.
    pub row: u16,
    /// Column within the row.
    pub col: u16,
}

/// Reassembles UTF-8 characters from single bytes.
///
/// Invalid lead bytes and stray continuation bytes are dropped. A partial
/// sequence interrupted by a non-continuation byte is discarded and the new
/// byte starts over.
#[derive(Debug, Clone, Default)]
pub struct Utf8Assembler {
    buf: [u8; 4],
    len: usize,
    need: usize,
}

impl Utf8Assembler {
    /// Feed one byte. Returns a character once its last byte has arrived.
    pub fn push(&mut self, byte: u8) -> Option<char> {
        if self.need == 0 {
            let need = match byte {
                0x00..=0x7F => return Some(char::from(byte)),
                0xC2..=0xDF => 2,
                0xE0..=0xEF => 3,
                0xF0..=0xF4 => 4,
                _ => {
                    tracing::trace!(byte, "dropping invalid lead byte");
                    return None;
                },
            };
            self.buf[0] = byte;
            self.len = 1;
            self.need = need;
            return None;
        }

        if byte & 0xC0 != 0x80 {
            tracing::trace!(byte, "partial character interrupted");
            self.reset();
            return self.push(byte);
        }

        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < self.need {
            return None;
        }

        let decoded = std::str::from_utf8(&self.buf[..self.len]).ok().and_then(|s| s.chars().next());
        self.reset();
        decoded
    }

    /// Whether a partial character is buffered.
    pub fn is_pending(&self) -> bool {
        self.need > 0
    }

    /// Drop any partial character.
    pub fn reset(&mut self) {
        self.len = 0;
        self.need = 0;
    }
}

/// Command-line state machine.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    phase: InputPhase,
    /// Everything typed so far, as rendered.
    line: String,
    name: String,
    message: String,
    /// Last recipient a direct message was committed to.
    saved_name: Option<String>,
    /// Current line is `@ message`.
    reuse_saved_name: bool,
    assembler: Utf8Assembler,
}

impl InputState {
    /// Create an empty machine with no saved recipient.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> InputPhase {
        self.phase
    }

    /// The line as typed.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Recipient typed on the current line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message typed on the current line.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Last recipient a direct message was committed to.
    pub fn saved_name(&self) -> Option<&str> {
        self.saved_name.as_deref()
    }

    /// Nothing typed and no partial character buffered.
    pub fn is_idle(&self) -> bool {
        self.phase == InputPhase::Idle && !self.assembler.is_pending()
    }

    /// Rendered units on the line.
    pub fn units(&self) -> usize {
        self.line.chars().count()
    }

    /// Cursor position after the last unit.
    pub fn cursor(&self) -> InputCursor {
        let units = self.units();
        InputCursor { row: (units / INPUT_COLUMNS) as u16, col: (units % INPUT_COLUMNS) as u16 }
    }

    /// Feed one raw byte, reassembling multi-byte characters.
    pub fn push_byte(&mut self, byte: u8) -> InputOutcome {
        match self.assemble(byte) {
            Some(c) => self.push_char(c),
            None => InputOutcome::Unchanged,
        }
    }

    /// Run a raw byte through the reassembler without touching the line.
    pub fn assemble(&mut self, byte: u8) -> Option<char> {
        self.assembler.push(byte)
    }

    /// Feed one character.
    pub fn push_char(&mut self, c: char) -> InputOutcome {
        if c.is_control() {
            return InputOutcome::Unchanged;
        }

        match self.phase {
            InputPhase::Idle => match CommandKind::from_prefix(c) {
                Some(kind) => {
                    self.phase = InputPhase::CommandSelect(kind);
                    self.line.push(c);
                    InputOutcome::Edited
                },
                None => {
                    self.clear_line();
                    InputOutcome::Rejected
                },
            },
            InputPhase::CommandSelect(CommandKind::Broadcast) => {
                if c != ' ' {
                    self.clear_line();
                    return InputOutcome::Rejected;
                }
                self.phase = InputPhase::CapturingMessage(CommandKind::Broadcast);
                self.line.push(c);
                InputOutcome::Edited
            },
            InputPhase::CommandSelect(CommandKind::Direct) => {
                if c == ' ' {
                    self.reuse_saved_name = true;
                    self.phase = InputPhase::CapturingMessage(CommandKind::Direct);
                } else {
                    self.reuse_saved_name = false;
                    self.name.clear();
                    self.name.push(c);
                    self.phase = InputPhase::CapturingName;
                }
                self.line.push(c);
                InputOutcome::Edited
            },
            InputPhase::CapturingName => {
                if c == ' ' {
                    self.phase = InputPhase::CapturingMessage(CommandKind::Direct);
                } else if self.name.chars().count() >= NAME_MAX_CHARS {
                    return InputOutcome::Unchanged;
                } else {
                    self.name.push(c);
                }
                self.line.push(c);
                InputOutcome::Edited
            },
            InputPhase::CapturingMessage(_) => {
                if self.units() >= LINE_MAX_UNITS
                    || self.message.len() + c.len_utf8() > MESSAGE_MAX_BYTES
                {
                    return InputOutcome::Unchanged;
                }
                self.message.push(c);
                self.line.push(c);
                InputOutcome::Edited
            },
        }
    }

    /// Remove the last unit, stepping back across separators.
    ///
    /// A buffered partial character is discarded first.
    pub fn backspace(&mut self) -> InputOutcome {
        if self.assembler.is_pending() {
            self.assembler.reset();
            return InputOutcome::Unchanged;
        }
        if self.line.pop().is_none() {
            return InputOutcome::Unchanged;
        }

        match self.phase {
            InputPhase::Idle => self.line.clear(),
            InputPhase::CommandSelect(_) => self.phase = InputPhase::Idle,
            InputPhase::CapturingName => {
                self.name.pop();
                if self.name.is_empty() {
                    self.phase = InputPhase::CommandSelect(CommandKind::Direct);
                }
            },
            InputPhase::CapturingMessage(kind) => {
                if self.message.pop().is_none() {
                    // Removed the separator after the prefix or name
                    self.phase = match kind {
                        CommandKind::Direct if !self.reuse_saved_name => InputPhase::CapturingName,
                        _ => InputPhase::CommandSelect(kind),
                    };
                    self.reuse_saved_name = false;
                }
            },
        }
        InputOutcome::Edited
    }

    /// Commit the line. The line is cleared whatever the outcome.
    pub fn commit(&mut self) -> InputOutcome {
        let phase = self.phase;
        let name = std::mem::take(&mut self.name);
        let message = std::mem::take(&mut self.message);
        let reuse = self.reuse_saved_name;
        self.clear_line();

        let kind = match phase {
            InputPhase::Idle => return InputOutcome::Unchanged,
            InputPhase::CommandSelect(kind) | InputPhase::CapturingMessage(kind) => kind,
            InputPhase::CapturingName => CommandKind::Direct,
        };
        if message.is_empty() {
            return InputOutcome::Abandoned;
        }

        match kind {
            CommandKind::Broadcast => InputOutcome::Committed(Submission::Broadcast { message }),
            CommandKind::Direct if reuse => match self.saved_name.clone() {
                Some(to) => InputOutcome::Committed(Submission::Direct { to, message }),
                None => InputOutcome::NoRecipient,
            },
            CommandKind::Direct => {
                self.saved_name = Some(name.clone());
                InputOutcome::Committed(Submission::Direct { to: name, message })
            },
        }
    }

    fn clear_line(&mut self) {
        self.phase = InputPhase::Idle;
        self.line.clear();
        self.name.clear();
        self.message.clear();
        self.reuse_saved_name = false;
        self.assembler.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut InputState, s: &str) {
        for c in s.chars() {
            input.push_char(c);
        }
    }

    #[test]
    fn broadcast_line_commits() {
        let mut input = InputState::new();
        type_str(&mut input, "* hello all");

        assert_eq!(input.phase(), InputPhase::CapturingMessage(CommandKind::Broadcast));
        assert_eq!(
            input.commit(),
            InputOutcome::Committed(Submission::Broadcast { message: "hello all".into() })
        );
        assert!(input.is_idle());
        assert_eq!(input.line(), "");
    }

    #[test]
    fn direct_line_saves_recipient() {
        let mut input = InputState::new();
        type_str(&mut input, "@alice hi");

        assert_eq!(
            input.commit(),
            InputOutcome::Committed(Submission::Direct { to: "alice".into(), message: "hi".into() })
        );
        assert_eq!(input.saved_name(), Some("alice"));
    }

    #[test]
    fn bare_at_reuses_saved_recipient() {
        let mut input = InputState::new();
        type_str(&mut input, "@alice hi");
        input.commit();

        type_str(&mut input, "@ again");
        assert_eq!(
            input.commit(),
            InputOutcome::Committed(Submission::Direct { to: "alice".into(), message: "again".into() })
        );
    }

    #[test]
    fn bare_at_without_saved_recipient() {
        let mut input = InputState::new();
        type_str(&mut input, "@ hello");

        assert_eq!(input.commit(), InputOutcome::NoRecipient);
        assert!(input.is_idle());
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        let mut input = InputState::new();
        assert_eq!(input.push_char('x'), InputOutcome::Rejected);
        assert!(input.is_idle());
    }

    #[test]
    fn broadcast_without_space_cancels_line() {
        let mut input = InputState::new();
        input.push_char('*');

        assert_eq!(input.push_char('x'), InputOutcome::Rejected);
        assert_eq!(input.line(), "");
        assert_eq!(input.phase(), InputPhase::Idle);
    }

    #[test]
    fn name_is_capped() {
        let mut input = InputState::new();
        input.push_char('@');
        type_str(&mut input, &"n".repeat(NAME_MAX_CHARS));

        assert_eq!(input.push_char('n'), InputOutcome::Unchanged);
        assert_eq!(input.name().chars().count(), NAME_MAX_CHARS);

        assert_eq!(input.push_char(' '), InputOutcome::Edited);
        assert_eq!(input.phase(), InputPhase::CapturingMessage(CommandKind::Direct));
    }

    #[test]
    fn line_is_capped_in_units() {
        let mut input = InputState::new();
        type_str(&mut input, "* ");
        type_str(&mut input, &"a".repeat(LINE_MAX_UNITS));

        assert_eq!(input.units(), LINE_MAX_UNITS);
        assert_eq!(input.message().len(), LINE_MAX_UNITS - 2);
    }

    #[test]
    fn message_is_capped_in_bytes() {
        let mut input = InputState::new();
        type_str(&mut input, "* ");
        // Three bytes per character: the byte cap is hit before the unit cap
        type_str(&mut input, &"€".repeat(100));

        assert_eq!(input.message().len(), MESSAGE_MAX_BYTES / 3 * 3);
        assert!(input.message().len() <= MESSAGE_MAX_BYTES);
    }

    #[test]
    fn backspace_steps_back_across_separators() {
        let mut input = InputState::new();
        type_str(&mut input, "@al h");

        input.backspace();
        assert_eq!(input.phase(), InputPhase::CapturingMessage(CommandKind::Direct));
        input.backspace();
        assert_eq!(input.phase(), InputPhase::CapturingName);
        assert_eq!(input.name(), "al");
        input.backspace();
        input.backspace();
        assert_eq!(input.phase(), InputPhase::CommandSelect(CommandKind::Direct));
        input.backspace();
        assert_eq!(input.phase(), InputPhase::Idle);
        assert_eq!(input.backspace(), InputOutcome::Unchanged);
    }

    #[test]
    fn backspace_over_reuse_separator() {
        let mut input = InputState::new();
        type_str(&mut input, "@ ");

        input.backspace();
        assert_eq!(input.phase(), InputPhase::CommandSelect(CommandKind::Direct));
        type_str(&mut input, "bob x");
        assert_eq!(
            input.commit(),
            InputOutcome::Committed(Submission::Direct { to: "bob".into(), message: "x".into() })
        );
    }

    #[test]
    fn multibyte_reassembly_and_backspace() {
        let mut input = InputState::new();
        for b in "* ".bytes() {
            input.push_byte(b);
        }

        assert_eq!(input.push_byte(0xD0), InputOutcome::Unchanged);
        assert!(!input.is_idle());
        assert_eq!(input.push_byte(0x9F), InputOutcome::Edited);
        assert_eq!(input.message(), "П");

        input.backspace();
        assert_eq!(input.message(), "");
        assert_eq!(input.line(), "* ");
    }

    #[test]
    fn interrupted_sequence_is_dropped() {
        let mut assembler = Utf8Assembler::default();
        assert_eq!(assembler.push(0xE2), None);
        assert_eq!(assembler.push(b'a'), Some('a'));
        assert!(!assembler.is_pending());
        assert_eq!(assembler.push(0x80), None);
    }

    #[test]
    fn empty_message_is_abandoned() {
        let mut input = InputState::new();
        type_str(&mut input, "* ");
        assert_eq!(input.commit(), InputOutcome::Abandoned);

        type_str(&mut input, "@bob");
        assert_eq!(input.commit(), InputOutcome::Abandoned);
        assert_eq!(input.saved_name(), None);
    }

    #[test]
    fn cursor_wraps_at_input_width() {
        let mut input = InputState::new();
        type_str(&mut input, "* ");
        type_str(&mut input, &"a".repeat(INPUT_COLUMNS));

        assert_eq!(input.cursor(), InputCursor { row: 1, col: 2 });
    }
}
