//! Grapheme accumulation for cell-grid placement.
//!
//! Groups a character stream into [`Cluster`]s, each of which is rendered as a
//! single terminal cell unit: a primary (base) character followed by zero or
//! more combining characters.
//!
//! The accumulator is a small explicit state machine:
//!
//! * `Idle`: nothing buffered.
//! * `Pending`: a cluster is buffered and may still absorb zero-width marks.
//! * `Joining`: the last character was a zero-width joiner; the next
//!   character joins the buffered cluster whatever its width.
//!
//! Invariants:
//! * A cluster's width is decided by its base character and never changes.
//! * A cluster with no visible base is anchored on a synthetic space
//!   ([`ANCHOR`]) and occupies one column.
//! * The joiner check runs before width classification, so a mark following
//!   a joiner is absorbed into the joined cluster.
//! * No state survives the iterator; feeding the same text twice yields the
//!   same clusters.

use crate::width::char_width;
use smallvec::SmallVec;
use std::iter::Fuse;
use std::mem;

/// Zero-width joiner (U+200D).
pub const ZWJ: char = '\u{200D}';

/// Synthetic base used when a cluster has no visible character of its own.
pub const ANCHOR: char = ' ';

/// One terminal cell unit: primary char, combining chars and display width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    chars: SmallVec<[char; 4]>,
    width: u8,
}

impl Cluster {
    fn with_base(base: char, width: u8) -> Self {
        let mut chars = SmallVec::new();
        chars.push(base);
        Self { chars, width }
    }

    fn anchored() -> Self {
        Self::with_base(ANCHOR, 1)
    }

    #[inline]
    fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    /// Character written as the cell's primary content.
    #[inline]
    pub fn primary(&self) -> char {
        self.chars[0]
    }

    /// Characters attached to the primary as combining content.
    #[inline]
    pub fn combining(&self) -> &[char] {
        &self.chars[1..]
    }

    /// Columns this cluster occupies (1 or 2).
    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn to_text(&self) -> String {
        self.chars.iter().collect()
    }
}

#[derive(Debug, Default)]
enum AccumState {
    #[default]
    Idle,
    Pending(Cluster),
    Joining(Cluster),
}

impl AccumState {
    fn into_cluster(self) -> Option<Cluster> {
        match self {
            AccumState::Idle => None,
            AccumState::Pending(c) | AccumState::Joining(c) => Some(c),
        }
    }

    /// Advance by one character. Returns the next state and, when `c` starts a
    /// new cluster, the one it completes.
    fn step(self, c: char) -> (AccumState, Option<Cluster>) {
        if c == ZWJ {
            let mut cluster = self.into_cluster().unwrap_or_else(Cluster::anchored);
            cluster.push(c);
            return (AccumState::Joining(cluster), None);
        }

        if let AccumState::Joining(mut cluster) = self {
            cluster.push(c);
            return (AccumState::Pending(cluster), None);
        }

        match char_width(c) {
            0 => {
                let mut cluster = self.into_cluster().unwrap_or_else(Cluster::anchored);
                cluster.push(c);
                (AccumState::Pending(cluster), None)
            }
            w => (
                AccumState::Pending(Cluster::with_base(c, w)),
                self.into_cluster(),
            ),
        }
    }
}

/// Iterator adapter turning characters into [`Cluster`]s.
pub struct Clusters<I: Iterator<Item = char>> {
    chars: Fuse<I>,
    state: AccumState,
}

impl<I: Iterator<Item = char>> Clusters<I> {
    pub fn new(chars: I) -> Self {
        Self {
            chars: chars.fuse(),
            state: AccumState::Idle,
        }
    }
}

impl<I: Iterator<Item = char>> Iterator for Clusters<I> {
    type Item = Cluster;

    fn next(&mut self) -> Option<Cluster> {
        loop {
            let Some(c) = self.chars.next() else {
                return mem::take(&mut self.state).into_cluster();
            };
            let (state, done) = mem::take(&mut self.state).step(c);
            self.state = state;
            if done.is_some() {
                return done;
            }
        }
    }
}

/// Cluster the characters of `text`.
pub fn clusters(text: &str) -> Clusters<std::str::Chars<'_>> {
    Clusters::new(text.chars())
}
