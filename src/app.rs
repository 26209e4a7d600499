//! Host side of the game: turns raw terminal input and timer ticks into
//! round engine operations, and owns the round timer's lifecycle.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, instrument};

use crate::difficulty::Difficulty;
use crate::round::{Phase, RoundEngine, RoundError, Snapshot};
use crate::runtime::{GameEvent, RoundTimer};
use crate::word_source::{resolve_secret, WordSource};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    engine: RoundEngine,
    words: Box<dyn WordSource>,
    events: Sender<GameEvent>,
    timer: Option<RoundTimer>,
    tick_interval: Duration,
    generation: u64,
    notice: Option<String>,
}

impl App {
    pub fn new(engine: RoundEngine, words: Box<dyn WordSource>, events: Sender<GameEvent>) -> Self {
        Self {
            engine,
            words,
            events,
            timer: None,
            tick_interval: TICK_INTERVAL,
            generation: 0,
            notice: None,
        }
    }

    /// Shorter intervals are only useful for tests
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.engine.snapshot()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(RoundTimer::is_running)
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        Difficulty::from_profile(&self.engine.selected_difficulty()).unwrap_or_default()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn handle_event(&mut self, event: GameEvent) -> Control {
        let control = match event {
            GameEvent::Tick(generation) => {
                if generation == self.generation {
                    self.engine.tick();
                } else {
                    debug!(generation, current = self.generation, "dropped stale tick");
                }
                Control::Continue
            }
            GameEvent::Resize => Control::Continue,
            GameEvent::Key(key) => self.on_key(key),
        };

        if self.engine.phase() != Phase::Playing && self.timer.is_some() {
            self.timer = None;
        }
        control
    }

    fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        self.notice = None;
        let playing = self.engine.phase() == Phase::Playing;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.engine.force_loss();
                return Control::Quit;
            }
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc if playing => {
                self.engine.force_loss();
            }
            KeyCode::Esc => return Control::Quit,
            KeyCode::Enter => {
                if let Err(e) = self.start_round() {
                    self.notice = Some(e.to_string());
                }
            }
            KeyCode::Left => self.select_difficulty(self.selected_difficulty().prev()),
            KeyCode::Right => self.select_difficulty(self.selected_difficulty().next()),
            KeyCode::Char(c @ '1'..='3') if !playing => {
                let idx = c as usize - '1' as usize;
                self.select_difficulty(Difficulty::ALL[idx]);
            }
            KeyCode::Char(c) => {
                self.engine.guess_letter(c);
            }
            _ => {}
        }
        Control::Continue
    }

    /// Draws a secret from the word source and starts a round with the
    /// selected difficulty, then starts a fresh round timer.
    #[instrument(skip(self))]
    pub fn start_round(&mut self) -> Result<(), RoundError> {
        if self.engine.phase() == Phase::Playing {
            return Err(RoundError::InvalidState {
                operation: "start a round",
                phase: Phase::Playing,
            });
        }

        let difficulty = self.engine.selected_difficulty();
        let secret = resolve_secret(self.words.as_mut(), &difficulty);
        self.engine.start_round(&secret, difficulty)?;

        // stop the previous timer before a new generation is handed out
        self.timer = None;
        self.generation += 1;
        self.timer = Some(RoundTimer::start(
            self.events.clone(),
            self.tick_interval,
            self.generation,
        ));
        info!(generation = self.generation, "round timer armed");
        Ok(())
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if let Err(e) = self.engine.select_difficulty(difficulty.profile()) {
            self.notice = Some(e.to_string());
        }
    }

    /// One-line message describing where the round stands
    pub fn status_line(&self) -> String {
        let round = self.engine.snapshot().round;
        match round.phase() {
            Phase::Idle => "Press Enter to start a round".to_string(),
            Phase::Playing => match round.remaining_guesses() {
                1 => "1 wrong guess left, Esc to give up".to_string(),
                n => format!("{n} wrong guesses left, Esc to give up"),
            },
            Phase::Won => "You guessed the word! Enter to play again".to_string(),
            Phase::Lost => format!("The word was {}. Enter to play again", round.secret()),
        }
    }
}
