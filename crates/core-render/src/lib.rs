//! Cell grid, text placement and terminal emission.
//!
//! A `Cell` is either a leader, carrying one primary char plus its combining
//! chars, or a continuation occupying the second column of a wide leader.
//! Continuations never print.
//!
//! Invariants:
//! - Leader: width >= 1.
//! - Continuation: width == 0, always immediately right of a wide leader.
//! - Overwriting either half of a wide cell blanks the other half so the
//!   grid never holds an orphaned continuation.
//! - Writes outside the grid are ignored.
//!
//! Exposed Components:
//! - `Grid`: the placement surface (`set_cell`, `size`, `clear`, `show`, `sync`).
//! - `Frame`: in-memory `Grid`; backs `screen::TerminalScreen` and tests.
//! - `place::put_str`: clusters text and writes it cell by cell.
//! - `status`: the two-row mode/command bar.
//! - `redraw`: full clear + dimension readout.
//! - `writer`: queued crossterm commands for emission.

use anyhow::Result;
use core_text::char_width;

pub mod place;
pub mod redraw;
pub mod screen;
pub mod status;
pub mod style;
pub mod writer;

pub use place::put_str;
pub use style::Style;

/// Placement surface addressed by (column, row).
pub trait Grid {
    /// Write `primary` with `combining` attached at (x, y). Out-of-bounds
    /// positions are ignored.
    fn set_cell(&mut self, x: u16, y: u16, primary: char, combining: &[char], style: Style);
    /// (width, height) in cells.
    fn size(&self) -> (u16, u16);
    /// Blank every cell with the grid's base style.
    fn clear(&mut self);
    /// Make pending changes visible.
    fn show(&mut self) -> Result<()>;
    /// Repaint everything regardless of what is believed to be visible.
    fn sync(&mut self) -> Result<()>;
    /// Reallocate for new dimensions. Contents are discarded.
    fn resize(&mut self, width: u16, height: u16);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    primary: char,
    combining: Vec<char>,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    width: u8,
    style: Style,
}

impl Cell {
    #[inline]
    pub fn leader(primary: char, combining: &[char], width: u16, style: Style) -> Self {
        Self {
            primary,
            combining: combining.to_vec(),
            width: width.clamp(1, 2) as u8,
            style,
        }
    }
    #[inline]
    pub fn continuation(style: Style) -> Self {
        Self {
            primary: ' ',
            combining: Vec::new(),
            width: 0,
            style,
        }
    }
    #[inline]
    pub fn blank(style: Style) -> Self {
        Self::leader(' ', &[], 1, style)
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
    #[inline]
    pub fn visual_width(&self) -> u16 {
        self.width as u16
    }
    #[inline]
    pub fn primary(&self) -> char {
        self.primary
    }
    #[inline]
    pub fn combining(&self) -> &[char] {
        &self.combining
    }
    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Primary followed by combining chars.
    pub fn text(&self) -> String {
        std::iter::once(self.primary)
            .chain(self.combining.iter().copied())
            .collect()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(Style::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    base: Style,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16, base: Style) -> Self {
        Self {
            width,
            height,
            base,
            cells: vec![Cell::blank(base); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Cells of row `y` (empty slice when out of range).
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Blank whatever wide cell (x, y) belongs to, keeping its style.
    fn release(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let cell = &self.cells[idx];
        if !cell.is_leader() {
            if x > 0 {
                let left = idx - 1;
                let style = self.cells[left].style;
                self.cells[left] = Cell::blank(style);
            }
            let style = self.cells[idx].style;
            self.cells[idx] = Cell::blank(style);
        } else if cell.width > 1 {
            let style = cell.style;
            if let Some(right) = self.index(x + 1, y) {
                self.cells[right] = Cell::blank(style);
            }
        }
    }

    /// Iterate leader cells of a row, yielding (start_x, &Cell).
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (u16, &Cell)> + '_ {
        let mut x = 0u16;
        let row = self.row(y);
        std::iter::from_fn(move || {
            while (x as usize) < row.len() {
                let cell = &row[x as usize];
                if cell.is_leader() {
                    let at = x;
                    x = x.saturating_add(cell.visual_width());
                    return Some((at, cell));
                }
                x += 1;
            }
            None
        })
    }

    /// Leader cell texts for a given row (testing / diagnostics only).
    pub fn line_clusters(&self, y: u16) -> Vec<String> {
        self.row_leaders(y).map(|(_, c)| c.text()).collect()
    }

    /// Row `y` as printed text.
    pub fn row_text(&self, y: u16) -> String {
        self.row_leaders(y).map(|(_, c)| c.text()).collect()
    }
}

impl Grid for Frame {
    fn set_cell(&mut self, x: u16, y: u16, primary: char, combining: &[char], style: Style) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = (char_width(primary).max(1) as u16).min(self.width - x);
        self.release(x, y);
        if w > 1 {
            self.release(x + 1, y);
        }
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(primary, combining, w, style);
        }
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(style);
            }
        }
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        let blank = Cell::blank(self.base);
        self.cells.fill(blank);
    }

    fn show(&mut self) -> Result<()> {
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        *self = Frame::new(width, height, self.base);
    }
}
