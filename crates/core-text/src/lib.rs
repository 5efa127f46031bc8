//! Character width classification and grapheme cluster accumulation.
//!
//! Text placed on the terminal grid flows through two stages:
//!
//! 1. [`char_width`] classifies each `char` as occupying 0, 1 or 2 columns.
//! 2. [`clusters`] groups a character stream into [`Cluster`]s: one base
//!    character plus any zero-width marks or zero-width-joiner continuations
//!    that must share its cell.
//!
//! Both stages are pure. Nothing here knows about the grid itself; placement
//! lives in `core-render`.

pub mod cluster;
pub mod width;

pub use cluster::{ANCHOR, Cluster, Clusters, ZWJ, clusters};
pub use width::{char_width, str_width};
