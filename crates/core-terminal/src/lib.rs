//! Terminal backend abstraction and crossterm implementation.

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::{debug, warn};

mod error;
pub use error::TerminalError;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<(), TerminalError>;
    fn leave(&mut self) -> Result<(), TerminalError>;
    fn set_title(&mut self, title: &str) -> Result<(), TerminalError>;

    /// Enter and return a guard that will leave on drop.
    fn enter_guard(&mut self) -> Result<TerminalGuard<'_, Self>, TerminalError>
    where
        Self: Sized,
    {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
    active: bool,
}

impl<B: TerminalBackend> TerminalGuard<'_, B> {
    /// Leave now instead of on drop, reporting any failure.
    pub fn release(mut self) -> Result<(), TerminalError> {
        self.active = false;
        self.backend.leave()
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if self.active
            && let Err(e) = self.backend.leave()
        {
            warn!(target: "terminal", error = %e, "restore_failed");
        }
    }
}

pub struct CrosstermBackend {
    entered: bool,
    size: (u16, u16),
}

impl CrosstermBackend {
    /// Probe the terminal; fails when stdout is not a terminal whose size can
    /// be read.
    pub fn new() -> Result<Self, TerminalError> {
        let size = terminal::size().map_err(TerminalError::Size)?;
        debug!(target: "terminal", width = size.0, height = size.1, "backend_created");
        Ok(Self {
            entered: false,
            size,
        })
    }

    /// (columns, rows) observed at construction.
    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<(), TerminalError> {
        if !self.entered {
            enable_raw_mode().map_err(TerminalError::Init)?;
            if let Err(e) = execute!(stdout(), EnterAlternateScreen, Hide) {
                let _ = disable_raw_mode();
                return Err(TerminalError::Init(e));
            }
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        if self.entered {
            self.entered = false;
            execute!(stdout(), LeaveAlternateScreen, Show).map_err(TerminalError::Restore)?;
            disable_raw_mode().map_err(TerminalError::Restore)?;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), TerminalError> {
        execute!(stdout(), SetTitle(title)).map_err(TerminalError::Init)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
