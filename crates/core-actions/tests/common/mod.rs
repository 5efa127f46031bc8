#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, dispatch, translate_key};
use core_config::StatusConfig;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::SessionState;

pub fn kc(c: char) -> KeyEvent {
    KeyEvent::plain(KeyCode::Char(c))
}

pub fn enter() -> KeyEvent {
    KeyEvent::plain(KeyCode::Enter)
}

pub fn esc() -> KeyEvent {
    KeyEvent::plain(KeyCode::Esc)
}

pub fn backspace() -> KeyEvent {
    KeyEvent::plain(KeyCode::Backspace)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CTRL)
}

/// Feed one key through translation and dispatch. Keys that translate to
/// nothing yield `None`.
pub fn press(state: &mut SessionState, key: &KeyEvent) -> Option<DispatchResult> {
    let action = translate_key(state.mode, state.command_line.buffer(), key)?;
    Some(dispatch(action, state, &StatusConfig::default()))
}

/// Type `text` char by char, returning every dispatch result.
pub fn type_str(state: &mut SessionState, text: &str) -> Vec<DispatchResult> {
    text.chars().filter_map(|c| press(state, &kc(c))).collect()
}
