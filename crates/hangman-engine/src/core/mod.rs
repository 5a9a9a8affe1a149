pub mod engine;
pub mod position;
