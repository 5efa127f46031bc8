//! Cell style values.
//!
//! A `Style` travels with every placement and is stored per cell. `None`
//! colors mean "terminal default" so an unstyled cell emits a reset rather
//! than a concrete color.

use core_config::{ColorName, ScreenConfig};
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub reverse: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            reverse: false,
        }
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Base style used when the screen is cleared.
    pub fn from_screen_config(cfg: &ScreenConfig) -> Self {
        Self {
            fg: Some(color_from_name(cfg.foreground)),
            bg: Some(color_from_name(cfg.background)),
            reverse: false,
        }
    }
}

pub fn color_from_name(name: ColorName) -> Color {
    match name {
        ColorName::Reset => Color::Reset,
        ColorName::Black => Color::Black,
        ColorName::Red => Color::DarkRed,
        ColorName::Green => Color::DarkGreen,
        ColorName::Yellow => Color::DarkYellow,
        ColorName::Blue => Color::DarkBlue,
        ColorName::Magenta => Color::DarkMagenta,
        ColorName::Cyan => Color::DarkCyan,
        ColorName::White => Color::White,
        ColorName::Grey => Color::Grey,
    }
}
