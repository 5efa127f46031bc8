//! Dispatcher applying `Action` to the session state.
//!
//! Every action ends with the session in a consistent mode/buffer pair:
//! `Normal` always has an empty buffer, `Command` always starts with `:`.

use crate::Action;
use core_config::StatusConfig;
use core_state::SessionState;

mod command;
pub(crate) mod command_parser;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Status bar needs repainting.
    pub dirty: bool,
    pub quit: bool,
    /// Whole screen must be cleared and repainted (`:redraw`).
    pub redraw: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            redraw: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            redraw: false,
        }
    }
    pub fn redraw() -> Self {
        Self {
            dirty: true,
            quit: false,
            redraw: true,
        }
    }
}

/// Apply an action to the session. `status` supplies the text shown for an
/// unrecognized command.
pub fn dispatch(action: Action, state: &mut SessionState, status: &StatusConfig) -> DispatchResult {
    tracing::trace!(
        target: "actions.dispatch",
        action = action_label(&action),
        mode = state.mode.label(),
        "dispatch"
    );
    let result = command::handle_command_action(action, state, status);
    if result.quit {
        tracing::info!(target: "actions.dispatch", "quit_requested");
    }
    result
}

fn action_label(action: &Action) -> &'static str {
    match action {
        Action::CommandStart => "command_start",
        Action::CommandChar(_) => "command_char",
        Action::CommandBackspace => "command_backspace",
        Action::CommandCancel => "command_cancel",
        Action::CommandExecute(_) => "command_execute",
        Action::Quit => "quit",
    }
}
