use thiserror::Error;

/// Errors raised while configuring the engine or setting up a round.
///
/// Guesses never fail: a guess the engine cannot act on is reported as
/// [`GuessOutcome::Ignored`](crate::GuessOutcome::Ignored). Running out of
/// lives is a normal terminal phase, not an error.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A container locator did not resolve to a node on the surface.
    #[error("Element not found with locator: {locator}")]
    NotFound { locator: String },

    /// The configuration is structurally valid JSON but unusable.
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    /// The configuration JSON could not be parsed.
    #[error("Failed to parse game configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The surface refused to create a node.
    #[error("Surface error: {0}")]
    Surface(String),
}

impl EngineError {
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::NotFound { locator: locator.into() }
    }
}
