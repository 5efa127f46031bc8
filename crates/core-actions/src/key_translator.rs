//! Key -> `Action` classification.
//!
//! Normal mode only reacts to `:`. Command mode appends every printable
//! character (including further `:`), edits with Backspace and executes on
//! Enter. Escape cancels and Ctrl-C quits in either mode.

use crate::Action;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::Mode;

pub fn translate_key(mode: Mode, pending_command: &str, key: &KeyEvent) -> Option<Action> {
    tracing::trace!(
        target: "actions.translate",
        mode = mode.label(),
        pending_len = pending_command.len(),
        ctrl = key.mods.contains(KeyModifiers::CTRL),
        "translate_key_attempt"
    );
    if key.mods.contains(KeyModifiers::CTRL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    match (mode, key.code) {
        (_, KeyCode::Esc) => Some(Action::CommandCancel),
        (Mode::Normal, KeyCode::Char(':')) => Some(Action::CommandStart),
        (Mode::Normal, _) => None,
        (Mode::Command, KeyCode::Char(c)) if !c.is_control() => Some(Action::CommandChar(c)),
        (Mode::Command, KeyCode::Char(_)) => None,
        (Mode::Command, KeyCode::Backspace) => Some(Action::CommandBackspace),
        (Mode::Command, KeyCode::Enter) => {
            Some(Action::CommandExecute(pending_command.to_string()))
        }
    }
}
