//! Command line classification.
//!
//! Converts the raw command buffer into a `ParsedCommand`. Matching is exact:
//! no trimming, no prefixes, no arguments. Pure; the dispatcher applies the
//! result.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Quit,
    Redraw,
    /// Anything else, carrying the buffer as typed.
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        match raw {
            ":quit" | ":q" => ParsedCommand::Quit,
            ":redraw" => ParsedCommand::Redraw,
            other => ParsedCommand::Unknown(other.to_string()),
        }
    }
}
