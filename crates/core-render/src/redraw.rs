//! Full-screen redraw used by `:redraw` and on terminal resize.

use crate::{Grid, Style, put_str};
use anyhow::Result;

/// Row holding the dimension readout.
pub const DIMENSIONS_ROW: u16 = 5;
const WIDTH_COLUMN: u16 = 1;
const HEIGHT_COLUMN: u16 = 10;

/// Clear the grid, print its width and height, then force a full repaint.
pub fn redraw_screen<G: Grid + ?Sized>(grid: &mut G, style: Style) -> Result<()> {
    grid.clear();
    let (width, height) = grid.size();
    put_str(grid, style, WIDTH_COLUMN, DIMENSIONS_ROW, &width.to_string());
    put_str(grid, style, HEIGHT_COLUMN, DIMENSIONS_ROW, &height.to_string());
    tracing::debug!(target: "render.screen", width, height, "redraw");
    grid.sync()
}
