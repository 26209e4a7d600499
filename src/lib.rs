// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod round;
pub mod runtime;
pub mod ui;
pub mod word_source;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use round::{Phase, RoundEngine, RoundError, RoundState, SessionCounters, Snapshot};
