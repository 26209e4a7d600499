use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named bundle of the wrong-guess limit and advisory word-length bounds.
///
/// The length bounds are hints for word sources only; the round engine
/// never checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    pub name: &'static str,
    pub max_wrong_guesses: u32,
    pub min_word_length: usize,
    pub max_word_length: usize,
}

impl DifficultyProfile {
    pub fn accepts_length(&self, len: usize) -> bool {
        (self.min_word_length..=self.max_word_length).contains(&len)
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

pub const EASY: DifficultyProfile = DifficultyProfile {
    name: "Easy",
    max_wrong_guesses: 8,
    min_word_length: 3,
    max_word_length: 6,
};

pub const MEDIUM: DifficultyProfile = DifficultyProfile {
    name: "Medium",
    max_wrong_guesses: 7,
    min_word_length: 5,
    max_word_length: 9,
};

pub const HARD: DifficultyProfile = DifficultyProfile {
    name: "Hard",
    max_wrong_guesses: 6,
    min_word_length: 7,
    max_word_length: 12,
};

pub const PROFILES: [DifficultyProfile; 3] = [EASY, MEDIUM, HARD];

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }

    /// Maps a profile back to its variant, if it is one of the static ones
    pub fn from_profile(profile: &DifficultyProfile) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.profile() == *profile)
    }

    /// Cycles forward, wrapping Hard back to Easy
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}
