//! Session state: input mode, command line buffer and the pending message.
//!
//! A single `SessionState` is owned by the runtime's event consumer and
//! mutated only through the dispatcher; nothing here is global.

use tracing::trace;

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Idle; `:` starts a command.
    #[default]
    Normal,
    /// A `:` command is being typed on the bottom row.
    Command,
}

impl Mode {
    /// Label shown on the mode row of the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    pub fn buffer(&self) -> &str {
        &self.buf
    }
    pub fn clear(&mut self) {
        self.buf.clear();
    }
    /// Begin a new command, discarding any previous content.
    pub fn begin(&mut self) {
        self.buf.clear();
        self.buf.push(':');
    }
    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }
    /// Remove the last char. Returns true when the buffer is now empty.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop();
        self.buf.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub mode: Mode,
    pub command_line: CommandLineState,
    message: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to command mode with a fresh `:` buffer.
    pub fn enter_command(&mut self) {
        self.mode = Mode::Command;
        self.command_line.begin();
        trace!(target: "state", mode = self.mode.label(), "mode_change");
    }

    /// Back to normal mode with an empty buffer. The pending message survives.
    pub fn reset_to_normal(&mut self) {
        self.mode = Mode::Normal;
        self.command_line.clear();
        trace!(target: "state", mode = self.mode.label(), "mode_change");
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Set the message shown on the command row once the buffer is empty.
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
    }

    /// Drop the message after it has been displayed. Returns it, if any.
    pub fn acknowledge_message(&mut self) -> Option<String> {
        self.message.take()
    }
}
