pub mod api;
pub mod core;
pub mod components;
pub mod surface;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::error::EngineError;
pub use api::game::{GameConfig, Locators};
pub use api::types::{GameEvent, NodeId};
pub use components::letter::{keyboard, LetterToken, TokenState, ALPHABET};
pub use components::slot::{blanks_for, BlankSlot};
pub use core::engine::{matching_indices, GuessOutcome, HangmanEngine, RoundPhase};
pub use core::position::{interpolate, Position};
pub use input::queue::{InputEvent, InputQueue};
pub use surface::{MemorySurface, NodeKind, NodeSpec, Surface};

// Extensions: clone flights
pub use extensions::{Movement, MoveBatch, MoveKind, DEFAULT_MOVE_DURATION_MS};
