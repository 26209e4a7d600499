//! The round engine: authoritative state for a single hangman round and the
//! only place that state is allowed to change.
//!
//! Hosts drive the engine with guesses, ticks and lifecycle requests, then
//! pull a [`Snapshot`] to redraw. Every operation runs to completion before
//! returning; there is no interior mutability and nothing here blocks.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::difficulty::DifficultyProfile;

/// Seconds on the clock at the start of every round
pub const ROUND_DURATION_SECS: u32 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("cannot {operation} while the round is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
    #[error("secret word {0:?} has no letters to guess")]
    EmptySecret(String),
}

/// What a guess did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not a letter, already guessed, or no round in progress
    Ignored,
    Hit,
    Miss,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Running(u32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterStatus {
    Unused,
    Hit,
    Miss,
}

/// Wins and losses for the lifetime of the process
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionCounters {
    pub wins: u32,
    pub losses: u32,
}

impl SessionCounters {
    pub fn rounds_played(&self) -> u32 {
        self.wins + self.losses
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    secret: String,
    // distinct A-Z letters of the secret, computed once per round
    targets: BTreeSet<char>,
    guessed: BTreeSet<char>,
    wrong_count: u32,
    phase: Phase,
    time_remaining: u32,
    active_difficulty: DifficultyProfile,
}

impl RoundState {
    fn idle(difficulty: DifficultyProfile) -> Self {
        Self {
            secret: String::new(),
            targets: BTreeSet::new(),
            guessed: BTreeSet::new(),
            wrong_count: 0,
            phase: Phase::Idle,
            time_remaining: ROUND_DURATION_SECS,
            active_difficulty: difficulty,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    /// Distinct letters the player has to find
    pub fn target_letters(&self) -> &BTreeSet<char> {
        &self.targets
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn active_difficulty(&self) -> &DifficultyProfile {
        &self.active_difficulty
    }

    pub fn remaining_guesses(&self) -> u32 {
        self.active_difficulty
            .max_wrong_guesses
            .saturating_sub(self.wrong_count)
    }

    pub fn letter_status(&self, c: char) -> LetterStatus {
        let letter = c.to_ascii_uppercase();
        if !self.guessed.contains(&letter) {
            LetterStatus::Unused
        } else if self.targets.contains(&letter) {
            LetterStatus::Hit
        } else {
            LetterStatus::Miss
        }
    }

    /// Guessed letters that are not in the secret, alphabetically
    pub fn missed_letters(&self) -> Vec<char> {
        self.guessed.difference(&self.targets).copied().collect()
    }

    /// The secret with unguessed letters replaced by `_`, one space between
    /// characters. Anything that is not a letter shows as itself.
    pub fn masked(&self) -> String {
        self.spaced(|c| {
            if self.targets.contains(&c) && !self.guessed.contains(&c) {
                '_'
            } else {
                c
            }
        })
    }

    pub fn revealed(&self) -> String {
        self.spaced(|c| c)
    }

    fn spaced(&self, f: impl Fn(char) -> char) -> String {
        let mut out = String::with_capacity(self.secret.len() * 2);
        for (i, c) in self.secret.chars().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(f(c));
        }
        out
    }
}

/// Read-only view handed to renderers after each operation
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub round: &'a RoundState,
    pub counters: SessionCounters,
    pub selected_difficulty: DifficultyProfile,
}

#[derive(Debug, Clone)]
pub struct RoundEngine {
    state: RoundState,
    counters: SessionCounters,
    selected: DifficultyProfile,
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new(DifficultyProfile::default())
    }
}

impl RoundEngine {
    pub fn new(difficulty: DifficultyProfile) -> Self {
        Self {
            state: RoundState::idle(difficulty),
            counters: SessionCounters::default(),
            selected: difficulty,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            round: &self.state,
            counters: self.counters,
            selected_difficulty: self.selected,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn selected_difficulty(&self) -> DifficultyProfile {
        self.selected
    }

    /// Starts a new round with `secret`, making `difficulty` both the
    /// selection and the active profile.
    ///
    /// Rejected while a round is in progress; the running round is left
    /// exactly as it was.
    pub fn start_round(
        &mut self,
        secret: &str,
        difficulty: DifficultyProfile,
    ) -> Result<(), RoundError> {
        self.ensure_not_playing("start a round")?;

        let secret = normalize(secret);
        let targets: BTreeSet<char> = secret
            .chars()
            .filter(|c| c.is_ascii_uppercase())
            .collect();
        if targets.is_empty() {
            warn!(%secret, "rejected secret without guessable letters");
            return Err(RoundError::EmptySecret(secret));
        }

        info!(
            difficulty = difficulty.name,
            letters = targets.len(),
            length = secret.chars().count(),
            "round started"
        );

        self.selected = difficulty;
        self.state = RoundState {
            secret,
            targets,
            guessed: BTreeSet::new(),
            wrong_count: 0,
            phase: Phase::Playing,
            time_remaining: ROUND_DURATION_SECS,
            active_difficulty: difficulty,
        };
        Ok(())
    }

    pub fn guess_letter(&mut self, c: char) -> GuessOutcome {
        if self.state.phase != Phase::Playing || !c.is_ascii_alphabetic() {
            return GuessOutcome::Ignored;
        }

        let letter = c.to_ascii_uppercase();
        if !self.state.guessed.insert(letter) {
            return GuessOutcome::Ignored;
        }

        if self.state.targets.contains(&letter) {
            debug!(%letter, "hit");
            if self.state.targets.is_subset(&self.state.guessed) {
                self.finish(Phase::Won);
                return GuessOutcome::Won;
            }
            GuessOutcome::Hit
        } else {
            self.state.wrong_count += 1;
            debug!(%letter, wrong = self.state.wrong_count, "miss");
            if self.state.wrong_count >= self.state.active_difficulty.max_wrong_guesses {
                self.finish(Phase::Lost);
                return GuessOutcome::Lost;
            }
            GuessOutcome::Miss
        }
    }

    /// One second has elapsed
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.phase != Phase::Playing {
            return TickOutcome::Ignored;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining == 0 {
            info!("round timer expired");
            self.finish(Phase::Lost);
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.state.time_remaining)
        }
    }

    /// Gives up the current round. Returns false when there was nothing to
    /// give up.
    pub fn force_loss(&mut self) -> bool {
        if self.state.phase != Phase::Playing {
            return false;
        }
        info!("round abandoned");
        self.finish(Phase::Lost);
        true
    }

    pub fn select_difficulty(&mut self, difficulty: DifficultyProfile) -> Result<(), RoundError> {
        self.ensure_not_playing("select a difficulty")?;
        debug!(difficulty = difficulty.name, "difficulty selected");
        self.selected = difficulty;
        Ok(())
    }

    fn ensure_not_playing(&self, operation: &'static str) -> Result<(), RoundError> {
        if self.state.phase == Phase::Playing {
            warn!(operation, "rejected while playing");
            return Err(RoundError::InvalidState {
                operation,
                phase: self.state.phase,
            });
        }
        Ok(())
    }

    fn finish(&mut self, phase: Phase) {
        match phase {
            Phase::Won => self.counters.wins += 1,
            Phase::Lost => self.counters.losses += 1,
            Phase::Idle | Phase::Playing => return,
        }
        self.state.phase = phase;
        info!(
            outcome = %phase,
            wins = self.counters.wins,
            losses = self.counters.losses,
            "round finished"
        );
    }
}

fn normalize(secret: &str) -> String {
    secret.trim().to_ascii_uppercase()
}
