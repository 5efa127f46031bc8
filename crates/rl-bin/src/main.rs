//! runeline entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::{Config, load_from};
use core_events::{
    ASYNC_INPUT_STARTS, CHANNEL_SEND_FAILURES, EVENT_CHANNEL_CAP, Event, KEYPRESS_TOTAL,
    QuitSignal, RESIZE_TOTAL,
};
use core_input::{AsyncInputShutdown, spawn_async_input};
use core_render::Style;
use core_render::screen::TerminalScreen;
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;

use runtime::{SessionRuntime, ShutdownReason, forward_shutdown, log_shutdown_stage};

const LOG_FILE: &str = "runeline.log";
const JOIN_TIMEOUT: Duration = Duration::from_millis(200);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "runeline", version, about = "Full-screen status and command line")]
struct Args {
    /// Optional configuration file path (overrides discovery of `runeline.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_config(args: &Args) -> Result<Config> {
        let config = load_from(args.config.clone())?;
        info!(
            target: "runtime.startup",
            config_override = args.config.is_some(),
            config_found = config.source.is_some(),
            status_column = config.file.status.column,
            "config_ready"
        );
        Ok(config)
    }
}

/// Resolve on SIGINT or SIGTERM delivered from outside the terminal. Raw mode
/// turns the Ctrl-C key into an ordinary key event, so this only fires for
/// signals sent by other processes.
async fn termination_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = term.recv() => {}
                    _ = interrupt() => {}
                }
            }
            Err(e) => {
                warn!(target: "runtime.startup", error = %e, "sigterm_handler_unavailable");
                interrupt().await;
            }
        }
    }
    #[cfg(not(unix))]
    interrupt().await;
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(target: "runtime.startup", error = %e, "sigint_handler_unavailable");
        std::future::pending::<()>().await;
    }
}

/// Background tasks the main task joins once the quit signal fires.
struct ShutdownHandles {
    consumer: JoinHandle<ShutdownReason>,
    input_task: JoinHandle<()>,
    input_shutdown: AsyncInputShutdown,
    signal_task: JoinHandle<()>,
}

impl ShutdownHandles {
    async fn finalize(self) -> ShutdownReason {
        self.signal_task.abort();
        let reason = match tokio::time::timeout(JOIN_TIMEOUT, self.consumer).await {
            Ok(Ok(reason)) => reason,
            Ok(Err(err)) => {
                error!(target: "runtime.shutdown", ?err, "consumer_task_join_failed");
                ShutdownReason::QuitSignal
            }
            Err(_) => {
                warn!(target: "runtime.shutdown", "consumer_task_timeout");
                ShutdownReason::QuitSignal
            }
        };
        log_shutdown_stage(reason, "begin");

        trace!(
            target: "runtime.shutdown",
            reason = reason.as_str(),
            "input_task_shutdown_signal"
        );
        self.input_shutdown.signal();
        match tokio::time::timeout(JOIN_TIMEOUT, self.input_task).await {
            Ok(Ok(())) => trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_joined"
            ),
            Ok(Err(err)) if err.is_cancelled() => trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_cancelled"
            ),
            Ok(Err(err)) => error!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                ?err,
                "input_task_join_failed"
            ),
            Err(_) => warn!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_timeout"
            ),
        }

        info!(
            target: "runtime.shutdown",
            keypresses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
            resizes = RESIZE_TOTAL.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            input_starts = ASYNC_INPUT_STARTS.load(Ordering::Relaxed),
            "input_telemetry"
        );
        log_shutdown_stage(reason, "complete");
        reason
    }
}

fn spawn_session(config: &Config, width: u16, height: u16, quit: &QuitSignal) -> ShutdownHandles {
    let base = Style::from_screen_config(&config.file.screen);
    let screen: TerminalScreen<Stdout> = TerminalScreen::new(io::stdout(), width, height, base);

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let signal_task = tokio::spawn(forward_shutdown(termination_signal(), tx.clone()));
    let (input_task, input_shutdown) = spawn_async_input(tx);

    let mut runtime = SessionRuntime::new(screen, &config.file, rx, quit.clone());
    let span = tracing::debug_span!(target: "runtime", "event_loop");
    // A panic inside the loop still releases `main` from `quit.wait()`.
    let exit_guard = quit.trigger_on_drop();
    let consumer = tokio::spawn(
        async move {
            let _exit_guard = exit_guard;
            runtime.run().await
        }
        .instrument(span),
    );

    ShutdownHandles {
        consumer,
        input_task,
        input_shutdown,
        signal_task,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = AppStartup::load_config(&args)?;

    let mut backend = CrosstermBackend::new().inspect_err(|e| {
        error!(target: "runtime.startup", error = %e, "terminal_backend_failed");
    })?;
    let (width, height) = backend.size();
    if let Err(e) = backend.set_title("runeline") {
        warn!(target: "runtime.startup", error = %e, "set_title_failed");
    }
    let guard = backend.enter_guard().inspect_err(|e| {
        error!(target: "runtime.startup", error = %e, "terminal_init_failed");
    })?;

    let quit = QuitSignal::new();
    let handles = spawn_session(&config, width, height, &quit);
    quit.wait().await;
    let reason = handles.finalize().await;

    if let Err(e) = guard.release() {
        error!(target: "runtime.shutdown", error = %e, "terminal_restore_failed");
    }
    info!(target: "runtime", reason = reason.as_str(), "exit");
    drop(startup);
    Ok(())
}
