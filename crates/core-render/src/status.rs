//! Two-row status bar: mode label above, command line / message below.
//!
//! Layout (rows counted from the bottom of the grid):
//! * `height - 2`: `NORMAL` or `COMMAND`.
//! * `height - 1`: the command buffer while one is being typed, otherwise the
//!   pending message, otherwise blank.
//!
//! Both rows start at the configured origin column and are padded with
//! spaces (or truncated on a cluster boundary) to the grid's right edge so
//! earlier, longer text never survives a repaint.

use crate::{Grid, Style, put_str};
use core_state::{Mode, SessionState};
use core_text::clusters;

/// Snapshot of what the status bar needs from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusContext<'a> {
    pub mode: Mode,
    pub command_buffer: &'a str,
    pub message: Option<&'a str>,
}

impl<'a> StatusContext<'a> {
    pub fn capture(state: &'a SessionState) -> Self {
        Self {
            mode: state.mode,
            command_buffer: state.command_line.buffer(),
            message: state.message(),
        }
    }

    /// Text for the bottom row; a message only shows while no command is typed.
    pub fn command_row_text(&self) -> &'a str {
        if self.command_buffer.is_empty() {
            self.message.unwrap_or("")
        } else {
            self.command_buffer
        }
    }

    /// True when the bottom row is displaying the pending message.
    pub fn shows_message(&self) -> bool {
        self.command_buffer.is_empty() && self.message.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLines {
    pub mode_row: String,
    pub command_row: String,
}

/// Truncate `text` on a cluster boundary to at most `columns` display
/// columns, then pad with spaces to exactly `columns`.
pub fn fit_to_width(text: &str, columns: usize) -> String {
    let mut out = String::with_capacity(columns);
    let mut used = 0usize;
    for cluster in clusters(text) {
        let w = cluster.width() as usize;
        if used + w > columns {
            break;
        }
        out.extend(cluster.chars().iter());
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', columns - used));
    out
}

/// Compose both rows for a bar `columns` cells wide.
pub fn compose_status(ctx: &StatusContext<'_>, columns: usize) -> StatusLines {
    StatusLines {
        mode_row: fit_to_width(ctx.mode.label(), columns),
        command_row: fit_to_width(ctx.command_row_text(), columns),
    }
}

/// Draw the status bar starting at column `origin`. Returns false when the
/// grid is too small to hold two rows and nothing was drawn.
pub fn render_status<G: Grid + ?Sized>(
    grid: &mut G,
    style: Style,
    origin: u16,
    ctx: &StatusContext<'_>,
) -> bool {
    let (width, height) = grid.size();
    if height < 2 {
        return false;
    }
    let columns = width.saturating_sub(origin) as usize;
    let lines = compose_status(ctx, columns);
    put_str(grid, style, origin, height - 2, &lines.mode_row);
    put_str(grid, style, origin, height - 1, &lines.command_row);
    tracing::trace!(
        target: "render.status",
        mode = ctx.mode.label(),
        command_len = ctx.command_buffer.len(),
        message = ctx.shows_message(),
        "status_rendered"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;

    fn ctx<'a>(mode: Mode, buf: &'a str, message: Option<&'a str>) -> StatusContext<'a> {
        StatusContext {
            mode,
            command_buffer: buf,
            message,
        }
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdef", 3), "abc");
        assert_eq!(fit_to_width("", 2), "  ");
    }

    #[test]
    fn fit_never_splits_wide_cluster() {
        // Two columns left but the next cluster needs two plus one used.
        assert_eq!(fit_to_width("a漢", 2), "a ");
        assert_eq!(fit_to_width("e\u{0301}x", 1), "e\u{0301}");
    }

    #[test]
    fn message_only_without_command() {
        let c = ctx(Mode::Normal, "", Some("UNKNOWN"));
        assert_eq!(c.command_row_text(), "UNKNOWN");
        assert!(c.shows_message());
        let c = ctx(Mode::Command, ":q", Some("UNKNOWN"));
        assert_eq!(c.command_row_text(), ":q");
        assert!(!c.shows_message());
    }

    #[test]
    fn renders_bottom_two_rows() {
        let mut f = Frame::new(12, 6, Style::default());
        assert!(render_status(
            &mut f,
            Style::default(),
            1,
            &ctx(Mode::Command, ":redraw", None)
        ));
        assert_eq!(f.row_text(4), " COMMAND    ");
        assert_eq!(f.row_text(5), " :redraw    ");
    }

    #[test]
    fn normal_label_overwrites_command_label() {
        let mut f = Frame::new(12, 4, Style::default());
        render_status(&mut f, Style::default(), 1, &ctx(Mode::Command, ":", None));
        render_status(&mut f, Style::default(), 1, &ctx(Mode::Normal, "", None));
        assert_eq!(f.row_text(2), " NORMAL     ");
        assert_eq!(f.row_text(3), "            ");
    }

    #[test]
    fn tiny_grid_is_skipped() {
        let mut f = Frame::new(10, 1, Style::default());
        assert!(!render_status(
            &mut f,
            Style::default(),
            1,
            &ctx(Mode::Normal, "", None)
        ));
    }
}
