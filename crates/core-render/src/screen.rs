//! Double-buffered terminal `Grid`.
//!
//! Callers draw into the back `Frame`. `show` compares it row by row with the
//! front `Frame` (what the terminal is believed to display) and emits only the
//! rows that differ; `sync` clears the terminal and repaints every row.
//! After either call the front frame equals the back frame.
//!
//! Emission never forwards control characters: a control primary prints as a
//! space and control combining chars are dropped. A leader clipped at the right
//! edge narrower than its glyph prints as a space so the terminal cursor does
//! not wrap. A zero-width primary is printed after a space so every leader
//! advances the cursor by its cell width.

use crate::writer::Writer;
use crate::{Cell, Frame, Grid, Style};
use anyhow::Result;
use core_text::char_width;
use std::io::Write;
use tracing::{debug, trace};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScreenStats {
    pub shows: u64,
    pub syncs: u64,
    pub rows_emitted: u64,
}

pub struct TerminalScreen<W: Write> {
    back: Frame,
    front: Frame,
    out: W,
    needs_sync: bool,
    stats: ScreenStats,
}

impl<W: Write> TerminalScreen<W> {
    /// The first `show` after construction performs a full sync.
    pub fn new(out: W, width: u16, height: u16, base: Style) -> Self {
        Self {
            back: Frame::new(width, height, base),
            front: Frame::new(width, height, base),
            out,
            needs_sync: true,
            stats: ScreenStats::default(),
        }
    }

    fn emit_row(writer: &mut Writer, frame: &Frame, y: u16) {
        writer.move_to(0, y);
        let mut current: Option<Style> = None;
        for (_, cell) in frame.row_leaders(y) {
            if current != Some(cell.style()) {
                writer.set_style(cell.style());
                current = Some(cell.style());
            }
            writer.print(printable(cell));
        }
        writer.reset_style();
    }
}

fn printable(cell: &Cell) -> String {
    let primary = cell.primary();
    let width = char_width(primary) as u16;
    if primary.is_control() || width > cell.visual_width() {
        return " ".to_string();
    }
    let marks = cell.combining().iter().copied().filter(|c| !c.is_control());
    if width == 0 {
        return [' ', primary].into_iter().chain(marks).collect();
    }
    std::iter::once(primary).chain(marks).collect()
}

impl<W: Write> Grid for TerminalScreen<W> {
    fn set_cell(&mut self, x: u16, y: u16, primary: char, combining: &[char], style: Style) {
        self.back.set_cell(x, y, primary, combining, style);
    }

    fn size(&self) -> (u16, u16) {
        self.back.size()
    }

    fn clear(&mut self) {
        self.back.clear();
    }

    fn show(&mut self) -> Result<()> {
        if self.needs_sync {
            return self.sync();
        }
        let (_, height) = self.back.size();
        let mut writer = Writer::new();
        let mut rows = 0u64;
        for y in 0..height {
            if self.back.row(y) != self.front.row(y) {
                Self::emit_row(&mut writer, &self.back, y);
                rows += 1;
            }
        }
        if !writer.is_empty() {
            writer.flush_to(&mut self.out)?;
        }
        self.front.clone_from(&self.back);
        self.stats.shows += 1;
        self.stats.rows_emitted += rows;
        trace!(target: "render.screen", rows, "show");
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        let (_, height) = self.back.size();
        let mut writer = Writer::new();
        writer.reset_style();
        writer.clear_all();
        for y in 0..height {
            Self::emit_row(&mut writer, &self.back, y);
        }
        writer.flush_to(&mut self.out)?;
        self.front.clone_from(&self.back);
        self.needs_sync = false;
        self.stats.syncs += 1;
        self.stats.rows_emitted += height as u64;
        debug!(
            target: "render.screen",
            rows = height,
            syncs = self.stats.syncs,
            rows_emitted = self.stats.rows_emitted,
            "sync"
        );
        Ok(())
    }

    /// The next `show` repaints everything.
    fn resize(&mut self, width: u16, height: u16) {
        self.back.resize(width, height);
        self.front.resize(width, height);
        self.needs_sync = true;
        debug!(target: "render.screen", width, height, "resize");
    }
}
