//! Session invariants.

use pichat_app::{
    InputPhase,
    input::{LINE_MAX_UNITS, MESSAGE_MAX_BYTES, NAME_MAX_CHARS},
};

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// `read_start <= read_end <= write_cursor`, and the visible rows are exactly
/// that slice.
pub struct WindowBounds;

impl Invariant for WindowBounds {
    fn name(&self) -> &'static str {
        "window_bounds"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.read_start > state.read_end || state.read_end > state.write_cursor {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "window [{}, {}) outside buffer of {} rows",
                    state.read_start, state.read_end, state.write_cursor
                ),
            });
        }
        if state.rows.get(state.read_start..state.read_end) != Some(&state.visible[..]) {
            return Err(Violation {
                invariant: self.name(),
                message: "visible rows differ from the window slice".to_string(),
            });
        }
        Ok(())
    }
}

/// The window never shows more rows than its height.
pub struct WindowHeight;

impl Invariant for WindowHeight {
    fn name(&self) -> &'static str {
        "window_height"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let shown = state.read_end.saturating_sub(state.read_start);
        if shown > state.window_height {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{shown} rows shown, height {}", state.window_height),
            });
        }
        Ok(())
    }
}

/// The buffer never holds more rows than its capacity.
pub struct CapacityBound;

impl Invariant for CapacityBound {
    fn name(&self) -> &'static str {
        "capacity_bound"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.write_cursor > state.capacity || state.rows.len() != state.write_cursor {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} rows, cursor {}, capacity {}",
                    state.rows.len(),
                    state.write_cursor,
                    state.capacity
                ),
            });
        }
        Ok(())
    }
}

/// No row is wider than the buffer.
pub struct RowWidth;

impl Invariant for RowWidth {
    fn name(&self) -> &'static str {
        "row_width"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match state.rows.iter().position(|row| row.chars().count() > state.width) {
            Some(index) => Err(Violation {
                invariant: self.name(),
                message: format!("row {index} wider than {}", state.width),
            }),
            None => Ok(()),
        }
    }
}

/// Name, message and line caps hold.
pub struct InputLimits;

impl Invariant for InputLimits {
    fn name(&self) -> &'static str {
        "input_limits"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let name_chars = state.input_name.chars().count();
        let line_units = state.input_line.chars().count();
        let message_bytes = state.input_message.len();

        if name_chars > NAME_MAX_CHARS
            || message_bytes > MESSAGE_MAX_BYTES
            || line_units > LINE_MAX_UNITS
        {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "name {name_chars} chars, message {message_bytes} bytes, line {line_units} units"
                ),
            });
        }
        Ok(())
    }
}

/// An idle input machine holds no text.
pub struct IdleInputEmpty;

impl Invariant for IdleInputEmpty {
    fn name(&self) -> &'static str {
        "idle_input_empty"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let has_text = !state.input_line.is_empty()
            || !state.input_name.is_empty()
            || !state.input_message.is_empty();
        if state.input_phase == InputPhase::Idle && has_text {
            return Err(Violation {
                invariant: self.name(),
                message: format!("idle with line {:?}", state.input_line),
            });
        }
        Ok(())
    }
}

/// Requests only queue behind one that is on the wire.
pub struct SingleRequestInFlight;

impl Invariant for SingleRequestInFlight {
    fn name(&self) -> &'static str {
        "single_request_in_flight"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.queued_requests > 0 && !state.request_in_flight {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} requests queued with none in flight", state.queued_requests),
            });
        }
        Ok(())
    }
}
