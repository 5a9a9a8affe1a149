pub mod letter;
pub mod slot;
