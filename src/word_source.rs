use std::time::Duration;

use include_dir::{include_dir, Dir};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::difficulty::DifficultyProfile;

static WORDS_DIR: Dir = include_dir!("src/words");

/// Secret used whenever the word source cannot supply one
pub const FALLBACK_WORD: &str = "developer";

pub const DEFAULT_WORD_API_URL: &str = "https://random-word-api.herokuapp.com/word?number=1";

const HTTP_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("word source returned no usable word")]
    EmptyResponse,
    #[error("word list {0:?} not found")]
    MissingList(String),
    #[error("word list has no words")]
    NoWords,
    #[error("unable to parse word list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies candidate secrets, one per round
pub trait WordSource {
    fn next_word(&mut self, difficulty: &DifficultyProfile) -> Result<String, WordSourceError>;
}

/// Asks `source` for one word, substituting [`FALLBACK_WORD`] when it fails
/// or hands back something without a single letter in it.
pub fn resolve_secret(source: &mut dyn WordSource, difficulty: &DifficultyProfile) -> String {
    match source.next_word(difficulty) {
        Ok(word) if word.chars().any(|c| c.is_ascii_alphabetic()) => word,
        Ok(word) => {
            warn!(%word, "word source returned no letters, using fallback");
            FALLBACK_WORD.to_string()
        }
        Err(e) => {
            warn!(error = %e, "word source failed, using fallback");
            FALLBACK_WORD.to_string()
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub words: Vec<String>,
}

impl WordList {
    pub fn bundled(name: &str) -> Result<Self, WordSourceError> {
        let file = WORDS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| WordSourceError::MissingList(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordSourceError::MissingList(name.to_string()))?;
        Ok(serde_json::from_str(contents)?)
    }

    /// Words whose length the profile accepts
    pub fn candidates(&self, difficulty: &DifficultyProfile) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| difficulty.accepts_length(w.chars().count()))
            .map(String::as_str)
            .collect()
    }
}

/// Picks from the word list embedded in the binary
#[derive(Debug)]
pub struct BundledWords {
    list: WordList,
    rng: StdRng,
}

impl BundledWords {
    pub fn new() -> Result<Self, WordSourceError> {
        Ok(Self::with_list(WordList::bundled("english")?))
    }

    pub fn with_list(list: WordList) -> Self {
        Self {
            list,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(list: WordList, seed: u64) -> Self {
        Self {
            list,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl WordSource for BundledWords {
    fn next_word(&mut self, difficulty: &DifficultyProfile) -> Result<String, WordSourceError> {
        let mut candidates = self.list.candidates(difficulty);
        if candidates.is_empty() {
            debug!(
                difficulty = difficulty.name,
                "no word fits the length bounds, drawing from the whole list"
            );
            candidates = self.list.words.iter().map(String::as_str).collect();
        }
        candidates
            .choose(&mut self.rng)
            .map(|w| w.to_string())
            .ok_or(WordSourceError::NoWords)
    }
}

/// Fetches a random word from an HTTP endpoint returning a JSON array of
/// strings. Length bounds are not forwarded.
#[derive(Debug, Clone)]
pub struct HttpWordSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpWordSource {
    pub fn new(url: impl Into<String>) -> Result<Self, WordSourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl WordSource for HttpWordSource {
    fn next_word(&mut self, _difficulty: &DifficultyProfile) -> Result<String, WordSourceError> {
        let words: Vec<String> = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json()?;
        debug!(count = words.len(), "fetched words");
        words
            .into_iter()
            .find(|w| !w.trim().is_empty())
            .ok_or(WordSourceError::EmptyResponse)
    }
}

/// Always the same word; used for `--word` and tests
#[derive(Debug, Clone)]
pub struct FixedWord(pub String);

impl WordSource for FixedWord {
    fn next_word(&mut self, _difficulty: &DifficultyProfile) -> Result<String, WordSourceError> {
        Ok(self.0.clone())
    }
}
