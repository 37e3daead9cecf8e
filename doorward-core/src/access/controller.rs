//! Access controller
//!
//! Owns the stored code, the input buffer and the current mode. Every
//! keypad press and presence change goes through [`AccessController::handle`],
//! which returns the diagnostic notice and peripheral command it caused.

use super::code::{codes_match, Code};
use super::events::{Command, Event, Notice, Reaction};
use super::mode::{Mode, Trigger};
use crate::indicator::IndicatorLevel;
use crate::keypad::Key;

/// Access controller context
#[derive(Debug, Clone)]
pub struct AccessController {
    /// Currently valid unlock code (never empty)
    stored: Code,
    /// Keys typed since the last confirm or mode change
    input: Code,
    mode: Mode,
}

impl AccessController {
    /// Create a controller with the given initial code
    ///
    /// The code must be non-empty; use [`super::parse_code`] to build one
    /// from configuration text.
    pub fn new(initial_code: Code) -> Self {
        debug_assert!(!initial_code.is_empty());
        Self {
            stored: initial_code,
            input: Code::new(),
            mode: Mode::Idle,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Keys typed so far
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Currently valid unlock code
    pub fn stored_code(&self) -> &str {
        &self.stored
    }

    /// Indicator level for the current mode
    pub fn indicator(&self) -> IndicatorLevel {
        self.mode.indicator()
    }

    /// Process one event
    pub fn handle(&mut self, event: Event) -> Reaction {
        match event {
            Event::PresenceDetected => self.on_presence_detected(),
            Event::PresenceLost => self.reset(),
            Event::KeyPressed(key) => self.on_key(key),
        }
    }

    /// Force the idle baseline: no mode, empty buffer, indicator off
    pub fn reset(&mut self) -> Reaction {
        let was_present = self.mode.is_present();
        self.apply(Trigger::PresenceLost);

        if was_present {
            Reaction::notice(Notice::SessionReset)
        } else {
            Reaction::none()
        }
    }

    fn on_presence_detected(&mut self) -> Reaction {
        if self.mode.is_present() {
            return Reaction::none();
        }
        self.apply(Trigger::PresenceDetected);
        Reaction::notice(Notice::PresenceDetected)
    }

    fn on_key(&mut self, key: Key) -> Reaction {
        match self.mode {
            Mode::Idle => Reaction::none(),
            Mode::Entry => self.on_entry_key(key),
            Mode::VerifyOld => self.on_verify_key(key),
            Mode::EnterNew => self.on_new_code_key(key),
        }
    }

    fn on_entry_key(&mut self, key: Key) -> Reaction {
        if key.is_confirm() {
            if self.input_matches() {
                self.apply(Trigger::CodeMatched);
                Reaction::notice(Notice::CodeAccepted).with_command(Command::Unlock)
            } else {
                self.apply(Trigger::CodeMismatched);
                Reaction::notice(Notice::CodeRejected)
            }
        } else if key.is_change_code() {
            self.apply(Trigger::ChangeCode);
            Reaction::notice(Notice::ChangeModeEntered)
        } else {
            self.append(key)
        }
    }

    fn on_verify_key(&mut self, key: Key) -> Reaction {
        if !key.is_confirm() {
            return self.append(key);
        }

        if self.input_matches() {
            self.apply(Trigger::CodeMatched);
            Reaction::notice(Notice::CurrentCodeAccepted)
        } else {
            self.apply(Trigger::CodeMismatched);
            Reaction::notice(Notice::CurrentCodeRejected)
        }
    }

    fn on_new_code_key(&mut self, key: Key) -> Reaction {
        if !key.is_confirm() {
            return self.append(key);
        }

        // Stored code stays non-empty
        if self.input.is_empty() {
            self.apply(Trigger::NewCodeRefused);
            return Reaction::notice(Notice::NewCodeRejected);
        }

        self.stored = self.input.clone();
        self.apply(Trigger::NewCodeStored);
        Reaction::notice(Notice::CodeChanged)
    }

    fn append(&mut self, key: Key) -> Reaction {
        match self.input.push(key.as_char()) {
            Ok(()) => Reaction::notice(Notice::InputUpdated(self.input.clone())),
            Err(_) => Reaction::notice(Notice::BufferFull),
        }
    }

    fn input_matches(&self) -> bool {
        codes_match(&self.input, &self.stored)
    }

    /// Move to the next mode; every transition clears the input buffer
    fn apply(&mut self, trigger: Trigger) {
        self.mode = self.mode.transition(trigger);
        self.input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::code::{parse_code, MAX_CODE_LEN};
    use proptest::prelude::*;

    fn controller() -> AccessController {
        AccessController::new(parse_code("123A").unwrap())
    }

    fn present() -> AccessController {
        let mut c = controller();
        c.handle(Event::PresenceDetected);
        c
    }

    fn key(c: char) -> Event {
        Event::KeyPressed(Key::new(c).unwrap())
    }

    /// Type every character of `keys` and return the reactions
    fn type_keys(c: &mut AccessController, keys: &str) -> std::vec::Vec<Reaction> {
        keys.chars().map(|k| c.handle(key(k))).collect()
    }

    fn unlock_count(reactions: &[Reaction]) -> usize {
        reactions.iter().filter(|r| r.unlocks()).count()
    }

    #[test]
    fn test_starts_idle() {
        let c = controller();
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.indicator(), IndicatorLevel::Off);
        assert_eq!(c.input(), "");
    }

    #[test]
    fn test_presence_enters_entry() {
        let mut c = controller();
        let reaction = c.handle(Event::PresenceDetected);
        assert_eq!(reaction.notice, Some(Notice::PresenceDetected));
        assert_eq!(c.mode(), Mode::Entry);
        assert_eq!(c.indicator(), IndicatorLevel::Dim);

        // Repeated detection is a no-op
        assert_eq!(c.handle(Event::PresenceDetected), Reaction::none());
    }

    #[test]
    fn test_keys_ignored_while_idle() {
        let mut c = controller();
        let reactions = type_keys(&mut c, "123A*");
        assert!(reactions.iter().all(|r| *r == Reaction::none()));
        assert_eq!(c.input(), "");
        assert_eq!(c.mode(), Mode::Idle);
    }

    #[test]
    fn test_correct_code_unlocks_once() {
        let mut c = present();
        let reactions = type_keys(&mut c, "123A*");
        assert_eq!(unlock_count(&reactions), 1);
        assert_eq!(reactions[4].notice, Some(Notice::CodeAccepted));
        assert_eq!(c.input(), "");
        assert_eq!(c.mode(), Mode::Entry);
    }

    #[test]
    fn test_wrong_code_does_not_unlock() {
        let mut c = present();
        let reactions = type_keys(&mut c, "9999*");
        assert_eq!(unlock_count(&reactions), 0);
        assert_eq!(reactions[4].notice, Some(Notice::CodeRejected));
        assert_eq!(c.input(), "");
        assert_eq!(c.mode(), Mode::Entry);
    }

    #[test]
    fn test_buffer_echo() {
        let mut c = present();
        let reactions = type_keys(&mut c, "12");
        let mut expected = Code::new();
        expected.push_str("12").unwrap();
        assert_eq!(reactions[1].notice, Some(Notice::InputUpdated(expected)));
    }

    #[test]
    fn test_empty_confirm_is_rejected() {
        let mut c = present();
        let reaction = c.handle(key('*'));
        assert_eq!(reaction.notice, Some(Notice::CodeRejected));
        assert!(!reaction.unlocks());
    }

    #[test]
    fn test_change_key_enters_verify() {
        let mut c = present();
        type_keys(&mut c, "12");
        let reaction = c.handle(key('D'));
        assert_eq!(reaction.notice, Some(Notice::ChangeModeEntered));
        assert_eq!(c.mode(), Mode::VerifyOld);
        assert_eq!(c.indicator(), IndicatorLevel::Bright);
        assert_eq!(c.input(), "");
    }

    #[test]
    fn test_full_change_cycle() {
        let mut c = present();
        c.handle(key('D'));

        let reactions = type_keys(&mut c, "123A*");
        assert_eq!(reactions[4].notice, Some(Notice::CurrentCodeAccepted));
        assert_eq!(c.mode(), Mode::EnterNew);
        assert_eq!(c.indicator(), IndicatorLevel::Bright);

        let reactions = type_keys(&mut c, "4567*");
        assert_eq!(reactions[4].notice, Some(Notice::CodeChanged));
        assert_eq!(unlock_count(&reactions), 0);
        assert_eq!(c.mode(), Mode::Entry);
        assert_eq!(c.indicator(), IndicatorLevel::Dim);
        assert_eq!(c.stored_code(), "4567");

        // Old code no longer opens
        let reactions = type_keys(&mut c, "123A*");
        assert_eq!(unlock_count(&reactions), 0);

        // New one does
        let reactions = type_keys(&mut c, "4567*");
        assert_eq!(unlock_count(&reactions), 1);
    }

    #[test]
    fn test_wrong_current_code_aborts_change() {
        let mut c = present();
        c.handle(key('D'));
        let reactions = type_keys(&mut c, "0000*");
        assert_eq!(reactions[4].notice, Some(Notice::CurrentCodeRejected));
        assert_eq!(c.mode(), Mode::Entry);
        assert_eq!(c.indicator(), IndicatorLevel::Dim);
        assert_eq!(c.stored_code(), "123A");
        assert_eq!(c.input(), "");
    }

    #[test]
    fn test_change_key_is_a_symbol_during_change() {
        let mut c = present();
        c.handle(key('D'));
        type_keys(&mut c, "12D");
        assert_eq!(c.input(), "12D");
        assert_eq!(c.mode(), Mode::VerifyOld);
    }

    #[test]
    fn test_new_code_may_contain_any_symbol() {
        let mut c = present();
        c.handle(key('D'));
        type_keys(&mut c, "123A*");
        type_keys(&mut c, "#D0*");
        assert_eq!(c.stored_code(), "#D0");
    }

    #[test]
    fn test_empty_new_code_is_refused() {
        let mut c = present();
        c.handle(key('D'));
        type_keys(&mut c, "123A*");
        let reaction = c.handle(key('*'));
        assert_eq!(reaction.notice, Some(Notice::NewCodeRejected));
        assert_eq!(c.mode(), Mode::Entry);
        assert_eq!(c.stored_code(), "123A");
    }

    #[test]
    fn test_presence_lost_during_change() {
        let mut c = present();
        c.handle(key('D'));
        type_keys(&mut c, "123A*");
        type_keys(&mut c, "99");

        let reaction = c.handle(Event::PresenceLost);
        assert_eq!(reaction.notice, Some(Notice::SessionReset));
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.indicator(), IndicatorLevel::Off);
        assert_eq!(c.input(), "");
        // Unfinished change leaves the code alone
        assert_eq!(c.stored_code(), "123A");

        // Coming back starts in normal entry
        c.handle(Event::PresenceDetected);
        assert_eq!(c.mode(), Mode::Entry);
    }

    #[test]
    fn test_reset_while_idle_is_silent() {
        let mut c = controller();
        assert_eq!(c.handle(Event::PresenceLost), Reaction::none());
    }

    #[test]
    fn test_buffer_full_drops_key() {
        let mut c = present();
        for _ in 0..MAX_CODE_LEN {
            c.handle(key('1'));
        }
        let reaction = c.handle(key('2'));
        assert_eq!(reaction.notice, Some(Notice::BufferFull));
        assert_eq!(c.input().len(), MAX_CODE_LEN);
        assert!(!c.input().contains('2'));
    }

    fn entry_symbol() -> impl Strategy<Value = char> {
        prop::sample::select(std::vec![
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', '#',
        ])
    }

    fn change_symbol() -> impl Strategy<Value = char> {
        prop::sample::select(std::vec![
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', '#',
        ])
    }

    proptest! {
        #[test]
        fn prop_entry_buffer_is_concatenation(
            keys in prop::collection::vec(entry_symbol(), 0..=MAX_CODE_LEN)
        ) {
            let mut c = present();
            for &k in &keys {
                let reaction = c.handle(key(k));
                prop_assert!(!reaction.unlocks());
            }
            let expected: std::string::String = keys.iter().collect();
            prop_assert_eq!(c.input(), expected.as_str());
            prop_assert_eq!(c.mode(), Mode::Entry);
        }

        #[test]
        fn prop_verify_buffer_is_concatenation(
            keys in prop::collection::vec(change_symbol(), 0..=MAX_CODE_LEN)
        ) {
            let mut c = present();
            c.handle(key('D'));
            for &k in &keys {
                c.handle(key(k));
            }
            let expected: std::string::String = keys.iter().collect();
            prop_assert_eq!(c.input(), expected.as_str());
            prop_assert_eq!(c.mode(), Mode::VerifyOld);
        }

        #[test]
        fn prop_presence_lost_always_resets(
            keys in prop::collection::vec(change_symbol(), 0..16),
            confirm_at in prop::option::of(0usize..16),
            change_first in any::<bool>(),
        ) {
            let mut c = present();
            if change_first {
                c.handle(key('D'));
            }
            for (i, &k) in keys.iter().enumerate() {
                if Some(i) == confirm_at {
                    c.handle(key('*'));
                }
                c.handle(key(k));
            }

            c.handle(Event::PresenceLost);
            prop_assert_eq!(c.mode(), Mode::Idle);
            prop_assert_eq!(c.input(), "");
            prop_assert_eq!(c.indicator(), IndicatorLevel::Off);
            prop_assert!(!c.stored_code().is_empty());
        }
    }
}
