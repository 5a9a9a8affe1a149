// extensions/mod.rs
//
// Animation helpers layered on top of the surface.
// Decoupled from rounds and tokens: they only know nodes and positions.

pub mod movement;

pub use movement::{Movement, MoveBatch, MoveKind, DEFAULT_MOVE_DURATION_MS};
