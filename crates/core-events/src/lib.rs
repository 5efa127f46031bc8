//! Event types, channel sizing, input telemetry and the quit signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Notify;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Single producer (input task), single consumer (session runtime). The bounded channel parks the
// producer when full instead of dropping keys; a command line is short enough that the cap is
// never approached in practice.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters, inspected by tests and logged at shutdown.
// -------------------------------------------------------------------------------------------------
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static RESIZE_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

/// Top-level event consumed by the session runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(InputEvent),
    Shutdown,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// Interrupt (Ctrl-C) surfaced distinctly from ordinary keys.
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }
}

/// Logical keys the application reacts to. Everything else is dropped at the
/// input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Default)]
struct QuitInner {
    done: AtomicBool,
    notify: Notify,
}

/// One-shot, cloneable termination flag.
///
/// Any clone may trigger it; only the first trigger returns true. Waiters
/// registered before or after the trigger all resolve.
#[derive(Debug, Clone, Default)]
pub struct QuitSignal {
    inner: Arc<QuitInner>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns true only for the call that raised it.
    pub fn trigger(&self) -> bool {
        let first = !self.inner.done.swap(true, Ordering::AcqRel);
        if first {
            self.inner.notify.notify_waiters();
            tracing::info!(target: "runtime", "quit_signal_triggered");
        }
        first
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.done.load(Ordering::Acquire)
    }

    /// Guard that raises the flag when dropped, including during a panic
    /// unwind of the task holding it.
    pub fn trigger_on_drop(&self) -> QuitOnDrop {
        QuitOnDrop {
            signal: self.clone(),
        }
    }

    /// Resolve once the flag is raised.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a trigger between the check and the
            // await is not missed.
            notified.as_mut().enable();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

/// See [`QuitSignal::trigger_on_drop`].
#[derive(Debug)]
pub struct QuitOnDrop {
    signal: QuitSignal,
}

impl Drop for QuitOnDrop {
    fn drop(&mut self) {
        if self.signal.trigger() && std::thread::panicking() {
            tracing::error!(target: "runtime", "quit_raised_by_panicking_task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn plain_key_has_no_modifiers() {
        assert!(KeyEvent::plain(KeyCode::Enter).mods.is_empty());
    }

    #[test]
    fn trigger_reports_first_caller_only() {
        let a = QuitSignal::new();
        let b = a.clone();
        assert!(!b.is_triggered());
        assert!(a.trigger());
        assert!(!b.trigger());
        assert!(!a.trigger());
        assert!(a.is_triggered() && b.is_triggered());
    }

    #[tokio::test]
    async fn wait_resolves_after_late_trigger() {
        let q = QuitSignal::new();
        let waiter = {
            let q = q.clone();
            tokio::spawn(async move { q.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(q.trigger());
        tokio::time::timeout(Duration::from_millis(200), waiter)
            .await
            .expect("waiter should resolve")
            .expect("waiter task should not panic");
    }

    #[tokio::test]
    async fn panicking_task_with_guard_raises_signal() {
        let q = QuitSignal::new();
        let guard = q.trigger_on_drop();
        let task = tokio::spawn(async move {
            let _guard = guard;
            panic!("consumer failed");
        });
        tokio::time::timeout(Duration::from_millis(200), q.wait())
            .await
            .expect("guard raises the signal on unwind");
        assert!(task.await.unwrap_err().is_panic());
    }

    #[test]
    fn dropping_guard_after_trigger_is_quiet() {
        let q = QuitSignal::new();
        let guard = q.trigger_on_drop();
        assert!(q.trigger());
        drop(guard);
        assert!(q.is_triggered());
    }

    #[tokio::test]
    async fn wait_resolves_when_already_triggered() {
        let q = QuitSignal::new();
        q.trigger();
        tokio::time::timeout(Duration::from_millis(50), q.wait())
            .await
            .expect("already triggered signal resolves immediately");
    }
}
