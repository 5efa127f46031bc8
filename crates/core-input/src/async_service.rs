//! Reader task: pulls `crossterm` events off an async stream and forwards the
//! ones the session cares about (keys, resizes, Ctrl-C) into the bounded
//! event channel.
//!
//! The task ends on the first of: an explicit shutdown request, the channel
//! closing, the stream ending, or a stream error. Each ending bumps its own
//! counter in `core_events` and is logged once under `input.thread`.

use crate::key_map::{map_key_code, map_mods};
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL, KeyEvent,
    RESIZE_TOTAL,
};
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind,
    KeyModifiers as CMods,
};
use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, info, trace, warn};

/// Handle asking the reader task to stop. A request made before the task
/// starts waiting is kept and honored on its first poll.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let shutdown = AsyncInputShutdown::new();
    let reader = InputReader::new(sender, EventStream::new(), shutdown.notify.clone());
    let span = tracing::debug_span!(target: "input.thread", "input_async_task");
    (task::spawn(reader.run().instrument(span)), shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopCause {
    Requested,
    ChannelClosed,
    StreamEnded,
    StreamError(io::ErrorKind),
}

impl StopCause {
    fn label(self) -> &'static str {
        match self {
            StopCause::Requested => "shutdown_signal",
            StopCause::ChannelClosed => "channel_closed",
            StopCause::StreamEnded => "stream_ended",
            StopCause::StreamError(_) => "stream_error",
        }
    }

    fn counter(self) -> &'static AtomicU64 {
        match self {
            StopCause::Requested => &ASYNC_INPUT_STOP_SIGNAL,
            StopCause::ChannelClosed => &ASYNC_INPUT_STOP_CHANNEL,
            StopCause::StreamEnded => &ASYNC_INPUT_STOP_STREAM,
            StopCause::StreamError(_) => &ASYNC_INPUT_STOP_ERROR,
        }
    }
}

struct InputReader<S> {
    sender: Sender<Event>,
    stream: S,
    stop: Arc<Notify>,
}

impl<S> InputReader<S>
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    fn new(sender: Sender<Event>, stream: S, stop: Arc<Notify>) -> Self {
        Self {
            sender,
            stream,
            stop,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);

        let cause = loop {
            let next = tokio::select! {
                biased;
                _ = self.stop.notified() => break StopCause::Requested,
                next = self.stream.next() => next,
            };
            let flow = match next {
                None => break StopCause::StreamEnded,
                Some(Err(err)) => break StopCause::StreamError(err.kind()),
                Some(Ok(event)) => self.forward(event).await,
            };
            if let ControlFlow::Break(cause) = flow {
                break cause;
            }
        };

        cause.counter().fetch_add(1, Ordering::Relaxed);
        if let StopCause::StreamError(kind) = cause {
            warn!(target: "input.thread", error_kind = ?kind, "async_input_task_stream_error");
        }
        info!(target: "input.thread", reason = cause.label(), "async_input_task_stopped");
    }

    async fn forward(&mut self, event: CEvent) -> ControlFlow<StopCause> {
        match event {
            CEvent::Key(key) => self.forward_key(key).await,
            CEvent::Resize(w, h) => {
                trace!(target: "input.event", w, h, "resize");
                RESIZE_TOTAL.fetch_add(1, Ordering::Relaxed);
                self.send(InputEvent::Resize(w, h)).await
            }
            // Focus, mouse and paste reports are not used.
            _ => ControlFlow::Continue(()),
        }
    }

    async fn forward_key(&mut self, key: CKeyEvent) -> ControlFlow<StopCause> {
        if !matches!(key.kind, CKind::Press | CKind::Repeat) {
            return ControlFlow::Continue(());
        }
        if is_ctrl_c(&key) {
            trace!(target: "input.event", kind = "ctrl_c");
            return self.send(InputEvent::CtrlC).await;
        }
        let Some(code) = map_key_code(&key.code) else {
            return ControlFlow::Continue(());
        };
        let mods = map_mods(key.modifiers);

        // Characters are never logged, only the kind of key.
        trace!(
            target: "input.event",
            kind = "keypress",
            key_kind = if matches!(key.code, CKeyCode::Char(_)) { "char" } else { "named" },
            mods = ?mods
        );

        let flow = self.send(InputEvent::Key(KeyEvent::new(code, mods))).await;
        if flow.is_continue() {
            KEYPRESS_TOTAL.fetch_add(1, Ordering::Relaxed);
        }
        flow
    }

    async fn send(&mut self, input: InputEvent) -> ControlFlow<StopCause> {
        if self.sender.send(Event::Input(input)).await.is_err() {
            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            return ControlFlow::Break(StopCause::ChannelClosed);
        }
        ControlFlow::Continue(())
    }
}

fn is_ctrl_c(key: &CKeyEvent) -> bool {
    matches!(key.code, CKeyCode::Char('c' | 'C')) && key.modifiers.contains(CMods::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyModifiers};
    use std::io::Write;
    use std::sync::Mutex;
    use tokio::sync::{Mutex as TokioMutex, mpsc};
    use tokio::time::{Duration, timeout};
    use tokio_stream::wrappers::UnboundedReceiverStream;

    // Log assertions install a thread-local subscriber; serialize them so
    // callsite interest is not rebuilt underneath a running capture.
    static LOG_CAPTURE_GUARD: TokioMutex<()> = TokioMutex::const_new(());

    #[derive(Clone, Default)]
    struct LogSink(Arc<Mutex<Vec<u8>>>);

    impl Write for LogSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogSink {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let sink = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_ansi(false)
                .without_time()
                .with_writer(move || sink.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn key(code: CKeyCode) -> CEvent {
        CEvent::Key(CKeyEvent::new(code, CMods::NONE))
    }

    fn reader<S>(tx: Sender<Event>, stream: S) -> (InputReader<S>, AsyncInputShutdown)
    where
        S: Stream<Item = io::Result<CEvent>> + Unpin,
    {
        let shutdown = AsyncInputShutdown::new();
        (InputReader::new(tx, stream, shutdown.notify.clone()), shutdown)
    }

    async fn run_scenario(events: Vec<CEvent>) -> Vec<Event> {
        let (tx, mut rx) = mpsc::channel(64);
        let (task, _shutdown) = reader(tx, tokio_stream::iter(events.into_iter().map(Ok)));
        task.run().await;

        let mut outputs = Vec::new();
        while let Some(evt) = rx.recv().await {
            outputs.push(evt);
        }
        outputs
    }

    fn plain(code: KeyCode) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::plain(code)))
    }

    #[tokio::test]
    async fn forwards_command_keys_in_order() {
        let base_total = KEYPRESS_TOTAL.load(Ordering::Relaxed);
        let outputs = run_scenario(vec![
            key(CKeyCode::Char(':')),
            key(CKeyCode::Char('q')),
            key(CKeyCode::Enter),
        ])
        .await;

        assert_eq!(
            outputs,
            vec![
                plain(KeyCode::Char(':')),
                plain(KeyCode::Char('q')),
                plain(KeyCode::Enter),
            ]
        );
        assert!(KEYPRESS_TOTAL.load(Ordering::Relaxed) - base_total >= 3);
    }

    #[tokio::test]
    async fn release_events_and_unmapped_keys_are_dropped() {
        let mut release = CKeyEvent::new(CKeyCode::Char('x'), CMods::NONE);
        release.kind = CKind::Release;
        let outputs = run_scenario(vec![
            CEvent::Key(release),
            key(CKeyCode::Left),
            CEvent::FocusGained,
            key(CKeyCode::Esc),
        ])
        .await;

        assert_eq!(outputs, vec![plain(KeyCode::Esc)]);
    }

    #[tokio::test]
    async fn modifiers_are_carried() {
        let outputs = run_scenario(vec![CEvent::Key(CKeyEvent::new(
            CKeyCode::Char('X'),
            CMods::SHIFT,
        ))])
        .await;
        assert_eq!(
            outputs,
            vec![Event::Input(InputEvent::Key(KeyEvent::new(
                KeyCode::Char('X'),
                KeyModifiers::SHIFT
            )))]
        );
    }

    #[tokio::test]
    async fn ctrl_c_and_resize_are_distinct_events() {
        let outputs = run_scenario(vec![
            CEvent::Resize(120, 48),
            CEvent::Key(CKeyEvent::new(CKeyCode::Char('C'), CMods::CONTROL)),
        ])
        .await;

        assert_eq!(
            outputs,
            vec![
                Event::Input(InputEvent::Resize(120, 48)),
                Event::Input(InputEvent::CtrlC),
            ]
        );
    }

    #[tokio::test]
    async fn keypress_log_never_contains_typed_char() {
        let _serial = LOG_CAPTURE_GUARD.lock().await;
        let sink = LogSink::default();
        let _guard = sink.install();

        let outputs = run_scenario(vec![key(CKeyCode::Char('§'))]).await;
        assert_eq!(outputs.len(), 1);

        let logged = sink.text();
        assert!(logged.contains("input.event"), "{logged}");
        assert!(logged.contains("key_kind=\"char\""), "{logged}");
        assert!(!logged.contains('§'), "typed char leaked: {logged}");
    }

    #[tokio::test]
    async fn shutdown_request_is_logged_and_counted() {
        let _serial = LOG_CAPTURE_GUARD.lock().await;
        let sink = LogSink::default();
        let _guard = sink.install();
        let base_start = ASYNC_INPUT_STARTS.load(Ordering::Relaxed);
        let base_signal = ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed);

        let (tx, _rx) = mpsc::channel(1);
        let (_event_tx, event_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let (task, shutdown) = reader(tx, UnboundedReceiverStream::new(event_rx));
        shutdown.signal();
        task.run().await;

        let logged = sink.text();
        assert!(logged.contains("async_input_task_started"), "{logged}");
        let stopped = logged
            .lines()
            .find(|line| line.contains("async_input_task_stopped"))
            .unwrap_or_else(|| panic!("missing stop log: {logged}"));
        assert!(stopped.contains("shutdown_signal"), "{stopped}");
        assert!(ASYNC_INPUT_STARTS.load(Ordering::Relaxed) > base_start);
        assert!(ASYNC_INPUT_STOP_SIGNAL.load(Ordering::Relaxed) > base_signal);
    }

    #[tokio::test]
    async fn closed_channel_stops_reader() {
        let base_channel = ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed);
        let base_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed);

        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let (task, _shutdown) = reader(tx, tokio_stream::iter(vec![Ok(CEvent::Resize(10, 10))]));
        task.run().await;

        assert!(ASYNC_INPUT_STOP_CHANNEL.load(Ordering::Relaxed) > base_channel);
        assert!(CHANNEL_SEND_FAILURES.load(Ordering::Relaxed) > base_failures);
    }

    #[tokio::test]
    async fn stream_error_stops_before_later_events() {
        let base_error = ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed);
        let (tx, mut rx) = mpsc::channel(4);
        let (task, _shutdown) = reader(
            tx,
            tokio_stream::iter(vec![
                Ok(key(CKeyCode::Char('a'))),
                Err(io::Error::other("tty gone")),
                Ok(key(CKeyCode::Char('b'))),
            ]),
        );
        task.run().await;

        assert_eq!(rx.recv().await, Some(plain(KeyCode::Char('a'))));
        assert_eq!(rx.recv().await, None);
        assert!(ASYNC_INPUT_STOP_ERROR.load(Ordering::Relaxed) > base_error);
    }

    #[tokio::test]
    async fn shutdown_interrupts_idle_stream_promptly() {
        let (tx, mut rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let (task, shutdown) = reader(tx, UnboundedReceiverStream::new(event_rx));

        let handle = tokio::spawn(async move {
            let _keep_alive = event_tx;
            task.run().await;
        });
        tokio::task::yield_now().await;
        shutdown.signal();

        timeout(Duration::from_millis(50), handle)
            .await
            .expect("shutdown should resolve promptly")
            .expect("task join failed");
        assert!(rx.recv().await.is_none());
    }
}
