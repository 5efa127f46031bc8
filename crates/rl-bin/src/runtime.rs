//! Session runtime: the single consumer of input events.
//!
//! Owns the `SessionState` and the screen exclusively; every event is
//! handled to completion before the next is read. Leaving the loop for any
//! reason raises the shared `QuitSignal`.

use core_actions::{Action, dispatch, translate_key};
use core_config::{ConfigFile, StatusConfig};
use core_events::{Event, InputEvent, KeyEvent, QuitSignal};
use core_render::redraw::redraw_screen;
use core_render::status::{StatusContext, render_status};
use core_render::{Grid, Style};
use core_state::SessionState;
use std::fmt;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{error, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownReason {
    CtrlC,
    CommandQuit,
    ShutdownEvent,
    ChannelClosed,
    QuitSignal,
}

impl ShutdownReason {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
            ShutdownReason::QuitSignal => "quit_signal",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

/// Wait for `signal`, then ask the runtime to stop with `Event::Shutdown`.
pub(crate) async fn forward_shutdown<F>(signal: F, tx: mpsc::Sender<Event>)
where
    F: Future<Output = ()>,
{
    signal.await;
    info!(target: "runtime", "termination_signal");
    if tx.send(Event::Shutdown).await.is_err() {
        trace!(target: "runtime", "shutdown_event_dropped_channel_closed");
    }
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

pub(crate) struct SessionRuntime<G: Grid> {
    grid: G,
    state: SessionState,
    status: StatusConfig,
    style: Style,
    rx: mpsc::Receiver<Event>,
    quit: QuitSignal,
}

impl<G: Grid> SessionRuntime<G> {
    pub(crate) fn new(
        grid: G,
        config: &ConfigFile,
        rx: mpsc::Receiver<Event>,
        quit: QuitSignal,
    ) -> Self {
        Self {
            grid,
            state: SessionState::new(),
            status: config.status.clone(),
            style: Style::from_screen_config(&config.screen),
            rx,
            quit,
        }
    }

    #[cfg(test)]
    pub(crate) fn grid(&self) -> &G {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) async fn run(&mut self) -> ShutdownReason {
        self.perform_initial_render();

        let reason = loop {
            let event = tokio::select! {
                biased;
                _ = self.quit.wait() => break ShutdownReason::QuitSignal,
                event = self.rx.recv() => event,
            };
            let Some(event) = event else {
                break ShutdownReason::ChannelClosed;
            };
            let control = match event {
                Event::Input(input) => self.handle_input_event(input),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            if let LoopControl::Break { reason } = control {
                break reason;
            }
        };

        self.rx.close();
        self.quit.trigger();
        info!(target: "runtime", reason = reason.as_str(), "event_loop_exit");
        reason
    }

    fn perform_initial_render(&mut self) {
        self.grid.clear();
        self.render_status();
    }

    fn handle_input_event(&mut self, input: InputEvent) -> LoopControl {
        match input {
            InputEvent::Key(key) => self.handle_key(&key),
            InputEvent::CtrlC => self.handle_ctrl_c(),
            InputEvent::Resize(w, h) => self.handle_resize(w, h),
        }
    }

    fn handle_ctrl_c(&mut self) -> LoopControl {
        info!(target: "runtime", "ctrl_c");
        LoopControl::Break {
            reason: ShutdownReason::CtrlC,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LoopControl {
        let Some(action) = translate_key(self.state.mode, self.state.command_line.buffer(), key)
        else {
            return LoopControl::Continue;
        };
        let from_ctrl_c = action == Action::Quit;
        let result = dispatch(action, &mut self.state, &self.status);
        if result.quit {
            return LoopControl::Break {
                reason: if from_ctrl_c {
                    ShutdownReason::CtrlC
                } else {
                    ShutdownReason::CommandQuit
                },
            };
        }
        if result.redraw {
            self.redraw();
        }
        if result.dirty {
            self.render_status();
        }
        LoopControl::Continue
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> LoopControl {
        trace!(target: "runtime", width, height, "resize");
        self.grid.resize(width, height);
        self.redraw();
        self.render_status();
        LoopControl::Continue
    }

    fn redraw(&mut self) {
        if let Err(e) = redraw_screen(&mut self.grid, self.style) {
            error!(target: "render.screen", ?e, "redraw_error");
        }
    }

    /// Draw the status bar and show it. A message that made it onto the
    /// screen is acknowledged so it appears exactly once.
    fn render_status(&mut self) {
        let ctx = StatusContext::capture(&self.state);
        let shown = render_status(&mut self.grid, self.style, self.status.column, &ctx)
            && ctx.shows_message();
        if let Err(e) = self.grid.show() {
            error!(target: "render.screen", ?e, "show_error");
        }
        if shown {
            self.state.acknowledge_message();
        }
    }
}
