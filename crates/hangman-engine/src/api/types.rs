use serde::Serialize;

/// Handle to a visual node owned by a [`Surface`](crate::Surface).
/// Tokens and slots cache the handle they were built with instead of
/// re-resolving nodes by their string identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Something the host may want to react to (status line, sound, restart button).
/// Recorded by the engine and drained once per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A fresh keyboard and blank row were built for `word_index`.
    RoundStarted { word_index: usize, length: usize },
    /// A guessed letter matched `count` positions.
    LetterRevealed { letter: char, count: usize },
    /// A guessed letter matched nothing.
    LifeLost { letter: char, remaining: u32 },
    /// Every slot of the word at `word_index` is solved.
    WordComplete { word_index: usize },
    /// The life pool ran dry; the round accepts no more guesses.
    OutOfLives { word_index: usize },
    /// The last word of the list was completed.
    WordsExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_string(&GameEvent::LifeLost { letter: 'Z', remaining: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"life_lost","letter":"Z","remaining":3}"#);

        let json = serde_json::to_string(&GameEvent::WordsExhausted).unwrap();
        assert_eq!(json, r#"{"kind":"words_exhausted"}"#);
    }
}
