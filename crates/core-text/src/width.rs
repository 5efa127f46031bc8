//! Display width classification for single characters.
//!
//! All width decisions for grid placement go through [`char_width`]. The
//! `unicode-width` table is authoritative; this module only narrows its
//! answer into the closed set `{0, 1, 2}` the placement engine understands.

use unicode_width::UnicodeWidthChar;

/// Return the number of terminal columns `c` occupies: 0, 1 or 2.
///
/// Characters without a table width (C0/C1 controls) are treated as zero
/// width so they decorate the surrounding cluster instead of claiming a cell.
/// Any other out-of-range answer falls back to a single column.
#[inline]
pub fn char_width(c: char) -> u8 {
    match UnicodeWidthChar::width(c) {
        None | Some(0) => 0,
        Some(2) => 2,
        Some(_) => 1,
    }
}

/// Sum of cluster widths for `s`, i.e. the columns `s` covers once placed.
pub fn str_width(s: &str) -> usize {
    crate::clusters(s).map(|c| c.width() as usize).sum()
}
