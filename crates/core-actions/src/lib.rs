//! Key translation and dispatch for the command line.
//!
//! Input flows through two pure steps:
//! 1. `translate_key(mode, pending_command, key)` classifies a key into an
//!    `Action` (or nothing).
//! 2. `dispatch(action, state, status)` applies it to the `SessionState` and
//!    reports what the runtime must do next (`DispatchResult`).

mod dispatcher;
mod key_translator;

pub use dispatcher::command_parser::{CommandParser, ParsedCommand};
pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::translate_key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `:` in normal mode.
    CommandStart,
    CommandChar(char),
    CommandBackspace,
    /// Escape: abandon the command line and return to normal mode.
    CommandCancel,
    /// Enter in command mode, carrying the buffer as typed.
    CommandExecute(String),
    /// Unconditional exit (Ctrl-C).
    Quit,
}
