//! Grid writer: places clustered text onto a `Grid`.

use crate::{Grid, Style};
use core_text::clusters;

/// Place `text` on row `y` starting at column `x` and return the column that
/// follows the last placed cluster (`x` itself for empty text).
///
/// Each cluster becomes one `set_cell` call: its first char is the cell's
/// primary content and the rest attach as combining content. The column then
/// advances by the cluster width. Placement never fails; whatever falls
/// outside the grid is dropped by the grid itself.
pub fn put_str<G: Grid + ?Sized>(grid: &mut G, style: Style, x: u16, y: u16, text: &str) -> u16 {
    let mut col = x;
    for cluster in clusters(text) {
        grid.set_cell(col, y, cluster.primary(), cluster.combining(), style);
        col = col.saturating_add(cluster.width() as u16);
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Grid double recording every placement in order.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(u16, u16, char, Vec<char>)>,
    }

    impl Grid for Recorder {
        fn set_cell(&mut self, x: u16, y: u16, primary: char, combining: &[char], _style: Style) {
            self.calls.push((x, y, primary, combining.to_vec()));
        }
        fn size(&self) -> (u16, u16) {
            (80, 24)
        }
        fn clear(&mut self) {
            self.calls.clear();
        }
        fn show(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn sync(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn resize(&mut self, _width: u16, _height: u16) {}
    }

    #[test]
    fn empty_text_places_nothing() {
        let mut g = Recorder::default();
        assert_eq!(put_str(&mut g, Style::default(), 1, 0, ""), 1);
        assert!(g.calls.is_empty());
    }

    #[test]
    fn combining_acute_is_one_cell() {
        let mut g = Recorder::default();
        let next = put_str(&mut g, Style::default(), 1, 3, "e\u{0301}");
        assert_eq!(next, 2);
        assert_eq!(g.calls, vec![(1, 3, 'e', vec!['\u{0301}'])]);
    }

    #[test]
    fn zwj_pair_is_one_wide_cell() {
        let mut g = Recorder::default();
        let next = put_str(&mut g, Style::default(), 1, 0, "\u{1F468}\u{200D}\u{1F469}");
        assert_eq!(next, 3);
        assert_eq!(
            g.calls,
            vec![(1, 0, '\u{1F468}', vec!['\u{200D}', '\u{1F469}'])]
        );
    }

    #[test]
    fn columns_advance_by_cluster_width() {
        let mut g = Recorder::default();
        let next = put_str(&mut g, Style::default(), 0, 0, "a漢b");
        assert_eq!(next, 4);
        let cols: Vec<u16> = g.calls.iter().map(|c| c.0).collect();
        assert_eq!(cols, vec![0, 1, 3]);
    }

    #[test]
    fn marks_only_land_on_synthetic_space() {
        let mut g = Recorder::default();
        let next = put_str(&mut g, Style::default(), 5, 0, "\u{0301}\u{0308}");
        assert_eq!(next, 6);
        assert_eq!(g.calls, vec![(5, 0, ' ', vec!['\u{0301}', '\u{0308}'])]);
    }

    #[test]
    fn column_saturates_at_edge() {
        let mut g = Recorder::default();
        assert_eq!(put_str(&mut g, Style::default(), u16::MAX, 0, "ab"), u16::MAX);
    }
}
