//! Property-based tests for line editing.

use pichat_app::{InputOutcome, InputState, Submission, Utf8Assembler};
use pichat_app::input::{LINE_MAX_UNITS, MESSAGE_MAX_BYTES, NAME_MAX_CHARS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_bytes_and_chars_build_same_line(text in "[*@][ a-zA-Zа-яё€😀]{0,80}") {
        let mut by_char = InputState::new();
        let mut by_byte = InputState::new();
        for c in text.chars() {
            by_char.push_char(c);
        }
        for byte in text.bytes() {
            by_byte.push_byte(byte);
        }

        prop_assert_eq!(by_char.line(), by_byte.line());
        prop_assert_eq!(by_char.phase(), by_byte.phase());
    }

    #[test]
    fn prop_caps_hold_for_any_keys(keys in prop::collection::vec(any::<char>(), 0..400)) {
        let mut input = InputState::new();
        for c in keys {
            input.push_char(c);
            prop_assert!(input.name().chars().count() <= NAME_MAX_CHARS);
            prop_assert!(input.message().len() <= MESSAGE_MAX_BYTES);
            prop_assert!(input.units() <= LINE_MAX_UNITS);
        }
    }

    #[test]
    fn prop_commit_always_clears(prefix in "[*@]", body in "[ a-z]{0,40}") {
        let mut input = InputState::new();
        for c in prefix.chars().chain(body.chars()) {
            input.push_char(c);
        }

        let outcome = input.commit();
        prop_assert!(input.is_idle());
        prop_assert!(input.line().is_empty());
        if let InputOutcome::Committed(Submission::Broadcast { message }) = outcome {
            prop_assert!(!message.is_empty());
        }
    }

    #[test]
    fn prop_assembler_decodes_valid_text(text in "\\PC{0,50}") {
        let mut assembler = Utf8Assembler::default();
        let decoded: String = text.bytes().filter_map(|b| assembler.push(b)).collect();
        prop_assert_eq!(decoded, text);
        prop_assert!(!assembler.is_pending());
    }
}
