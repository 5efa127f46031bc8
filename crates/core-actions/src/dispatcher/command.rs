//! Command line editing and execution.

use super::DispatchResult;
use super::command_parser::{CommandParser, ParsedCommand};
use crate::Action;
use core_config::StatusConfig;
use core_state::SessionState;

pub(crate) fn handle_command_action(
    action: Action,
    state: &mut SessionState,
    status: &StatusConfig,
) -> DispatchResult {
    match action {
        Action::CommandStart => {
            state.enter_command();
            DispatchResult::dirty()
        }
        Action::CommandChar(ch) => {
            state.command_line.push_char(ch);
            DispatchResult::dirty()
        }
        Action::CommandBackspace => {
            if state.command_line.backspace() {
                state.reset_to_normal();
            }
            DispatchResult::dirty()
        }
        Action::CommandCancel => {
            state.reset_to_normal();
            DispatchResult::dirty()
        }
        Action::CommandExecute(raw) => execute_command(&raw, state, status),
        Action::Quit => DispatchResult::quit(),
    }
}

fn execute_command(raw: &str, state: &mut SessionState, status: &StatusConfig) -> DispatchResult {
    let result = match CommandParser::parse(raw) {
        ParsedCommand::Quit => DispatchResult::quit(),
        ParsedCommand::Redraw => DispatchResult::redraw(),
        ParsedCommand::Unknown(cmd) => {
            tracing::debug!(target: "actions.dispatch", len = cmd.len(), "unknown_command");
            state.set_message(status.unknown_message.clone());
            DispatchResult::dirty()
        }
    };
    state.reset_to_normal();
    result
}
