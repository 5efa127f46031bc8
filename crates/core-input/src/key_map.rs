use core_events::{KeyCode, KeyModifiers};
use crossterm::event::{KeyCode as CKeyCode, KeyModifiers as CMods};

/// Translate the crossterm keys the application reacts to. Everything else
/// (arrows, function keys, media keys) maps to `None` and is dropped.
pub fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    match code {
        CKeyCode::Char(c) => Some(KeyCode::Char(*c)),
        CKeyCode::Enter => Some(KeyCode::Enter),
        CKeyCode::Esc => Some(KeyCode::Esc),
        CKeyCode::Backspace => Some(KeyCode::Backspace),
        _ => None,
    }
}

pub fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
