use std::io;
use thiserror::Error;

/// Fatal terminal setup failures.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// The terminal size could not be queried while constructing the backend.
    #[error("unable to query terminal size: {0}")]
    Size(#[source] io::Error),
    /// Raw mode or the alternate screen could not be entered.
    #[error("unable to initialize terminal: {0}")]
    Init(#[source] io::Error),
    #[error("unable to restore terminal: {0}")]
    Restore(#[source] io::Error),
}
