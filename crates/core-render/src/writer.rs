//! Terminal writer: batches primitive terminal operations and emits them in
//! one flush.
//!
//! Design invariants:
//! * Commands preserve ordering; nothing is written before `flush_to`.
//! * All positions are absolute (0,0) origin; caller ensures bounds.
//! * Styles are emitted as full fg/bg/reverse triples so no attribute leaks
//!   from one cell run into the next.
//! * Writer owns no global state; it is a short-lived object per frame.

use crate::Style;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearAll,
    SetStyle(Style),
    ResetStyle,
    Print(String),
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }
    pub fn set_style(&mut self, style: Style) {
        self.cmds.push(Command::SetStyle(style));
    }
    pub fn reset_style(&mut self) {
        self.cmds.push(Command::ResetStyle);
    }
    /// Queue text; consecutive prints are merged into one command.
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if let Some(Command::Print(prev)) = self.cmds.last_mut() {
            prev.push_str(&s);
        } else {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::ClearAll => {
                    queue!(out, Clear(ClearType::All))?;
                }
                Command::SetStyle(style) => {
                    queue!(
                        out,
                        SetForegroundColor(style.fg.unwrap_or(Color::Reset)),
                        SetBackgroundColor(style.bg.unwrap_or(Color::Reset)),
                        SetAttribute(if style.reverse {
                            Attribute::Reverse
                        } else {
                            Attribute::NoReverse
                        })
                    )?;
                }
                Command::ResetStyle => {
                    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
                }
                Command::Print(s) => {
                    queue!(out, Print(s))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_prints_merge() {
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.print("a");
        w.print("b");
        w.print("");
        w.set_style(Style::default());
        w.print("c");
        assert_eq!(
            w.cmds,
            vec![
                Command::MoveTo(0, 0),
                Command::Print("ab".into()),
                Command::SetStyle(Style::default()),
                Command::Print("c".into()),
            ]
        );
    }

    #[test]
    fn flush_emits_text_and_cursor_moves() {
        let mut w = Writer::new();
        w.move_to(2, 3);
        w.print("hi");
        let mut out = Vec::new();
        w.flush_to(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        // crossterm MoveTo is 1-based on the wire.
        assert!(s.contains("\x1b[4;3H"), "{s:?}");
        assert!(s.ends_with("hi"));
    }
}
