use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;
use crate::components::letter::ALPHABET;
use crate::extensions::movement::DEFAULT_MOVE_DURATION_MS;

/// Configuration for the engine, provided by the host.
/// Every field has a default, so `{}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Secret words, played in order. Matching is exact, case as stored.
    pub words: Vec<String>,
    /// Size of the life pool (default: 5).
    pub max_lives: u32,
    /// Clone flight duration in milliseconds (default: 500).
    pub move_duration_ms: f64,
    /// How far above its slot a flying clone lands (default: 20).
    pub landing_offset: f32,
    /// Illustration path prefix; the image for level N is `{prefix}{N}.png`.
    pub image_prefix: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            words: vec!["NOURRITURE".into(), "MARS".into(), "AVRIL".into()],
            max_lives: 5,
            move_duration_ms: DEFAULT_MOVE_DURATION_MS,
            landing_offset: 20.0,
            image_prefix: "./assets/images/hangman-".into(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder shortcut used by hosts and tests that only care about the words.
    pub fn with_words<I, W>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_lives(mut self, max_lives: u32) -> Self {
        self.max_lives = max_lives;
        self
    }

    pub fn with_move_duration(mut self, ms: f64) -> Self {
        self.move_duration_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.words.is_empty() {
            return Err(EngineError::InvalidConfig("word list is empty".into()));
        }
        if let Some(i) = self.words.iter().position(|w| w.is_empty()) {
            return Err(EngineError::InvalidConfig(format!("word {} is empty", i)));
        }
        // A letter off the keyboard could never be guessed, so the word could never complete.
        for (i, word) in self.words.iter().enumerate() {
            if let Some(c) = word.chars().find(|c| !ALPHABET.contains(c)) {
                return Err(EngineError::InvalidConfig(format!(
                    "word {} contains {:?}, which is not on the keyboard",
                    i, c
                )));
            }
        }
        if self.max_lives == 0 {
            return Err(EngineError::InvalidConfig("max_lives must be at least 1".into()));
        }
        // Zero and negative durations are legal: movements then settle instantly.
        if !self.move_duration_ms.is_finite() {
            return Err(EngineError::InvalidConfig("move_duration_ms must be finite".into()));
        }
        if !self.landing_offset.is_finite() {
            return Err(EngineError::InvalidConfig("landing_offset must be finite".into()));
        }
        Ok(())
    }

    /// Path of the failure illustration for `level`.
    pub fn image_path(&self, level: u32) -> String {
        format!("{}{}.png", self.image_prefix, level)
    }
}

/// Caller-supplied locators for the three containers the engine renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locators {
    /// Container receiving the blank slots (and the flying/resting clones).
    pub spaces: String,
    /// Container receiving the on-screen keyboard.
    pub buttons: String,
    /// Image node showing the failure illustration.
    pub image: String,
}

impl Locators {
    pub fn new(
        spaces: impl Into<String>,
        buttons: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            spaces: spaces.into(),
            buttons: buttons.into(),
            image: image.into(),
        }
    }
}

impl Default for Locators {
    fn default() -> Self {
        Self::new(".game-spaces-container", ".game-keyboard-container", "#game-hangman-image")
    }
}
