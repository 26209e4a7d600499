use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::{debug, warn};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// One second of a round has elapsed; carries the timer generation that
    /// produced it so ticks from a cancelled timer can be told apart.
    Tick(u64),
}

/// Source of events for the app runner
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;

    /// Handle for producers (round timers) feeding the same queue
    fn sender(&self) -> Sender<GameEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<GameEvent>,
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let reader_tx = tx.clone();
        thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => GameEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if reader_tx.send(evt).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<GameEvent> {
        self.tx.clone()
    }
}

/// Test event source for unit and headless tests
pub struct TestEventSource {
    tx: Sender<GameEvent>,
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<GameEvent> {
        self.tx.clone()
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: GameEventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    pub fn sender(&self) -> Sender<GameEvent> {
        self.event_source.sender()
    }

    /// Blocks up to the poll interval; None when nothing arrived
    pub fn step(&self) -> Option<GameEvent> {
        self.event_source.recv_timeout(self.poll_interval).ok()
    }
}

/// Recurring tick source for a single round.
///
/// Emits `GameEvent::Tick(generation)` every `interval` until stopped or
/// dropped. Stopping joins the worker thread, so no tick is sent after
/// `stop` returns.
#[derive(Debug)]
pub struct RoundTimer {
    generation: u64,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RoundTimer {
    pub fn start(events: Sender<GameEvent>, interval: Duration, generation: u64) -> Self {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            match cancel_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if events.send(GameEvent::Tick(generation)).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        debug!(generation, "round timer started");

        Self {
            generation,
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn stop(&mut self) {
        // dropping the sender wakes the worker with Disconnected
        self.cancel.take();
        if let Some(handle) = self.handle.take() {
            if join_worker(handle, self.generation) {
                debug!(generation = self.generation, "round timer stopped");
            }
        }
    }
}

/// Waits for a timer thread; false when it panicked
fn join_worker(handle: JoinHandle<()>, generation: u64) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            warn!(generation, "round timer thread panicked");
            false
        }
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_none_on_timeout() {
        let runner = Runner::new(TestEventSource::new(), Duration::from_millis(1));
        assert_eq!(runner.step(), None);
    }

    #[test]
    fn step_passes_through_events() {
        let runner = Runner::new(TestEventSource::new(), Duration::from_millis(10));
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        runner.sender().send(GameEvent::Key(key)).unwrap();
        runner.sender().send(GameEvent::Resize).unwrap();

        assert_eq!(runner.step(), Some(GameEvent::Key(key)));
        assert_eq!(runner.step(), Some(GameEvent::Resize));
    }

    #[test]
    fn timer_emits_ticks_with_its_generation() {
        let source = TestEventSource::new();
        let _timer = RoundTimer::start(source.sender(), Duration::from_millis(1), 7);

        for _ in 0..3 {
            let ev = source.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(ev, GameEvent::Tick(7));
        }
    }

    #[test]
    fn stopped_timer_goes_quiet() {
        let source = TestEventSource::new();
        let mut timer = RoundTimer::start(source.sender(), Duration::from_millis(1), 1);
        source.recv_timeout(Duration::from_secs(2)).unwrap();

        timer.stop();
        assert!(!timer.is_running());

        // drain whatever was queued before the stop
        while source.recv_timeout(Duration::from_millis(5)).is_ok() {}
        assert_eq!(
            source.recv_timeout(Duration::from_millis(20)),
            Err(RecvTimeoutError::Timeout)
        );
    }

    #[test]
    fn join_worker_reports_panicked_thread() {
        let ok = thread::spawn(|| {});
        assert!(join_worker(ok, 1));

        let panicked = thread::spawn(|| panic!("timer worker died"));
        assert!(!join_worker(panicked, 2));
    }

    #[test]
    fn dropping_timer_stops_it() {
        let source = TestEventSource::new();
        {
            let _timer = RoundTimer::start(source.sender(), Duration::from_millis(1), 3);
            source.recv_timeout(Duration::from_secs(2)).unwrap();
        }
        while source.recv_timeout(Duration::from_millis(5)).is_ok() {}
        assert!(source.recv_timeout(Duration::from_millis(20)).is_err());
    }
}
