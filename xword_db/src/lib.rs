#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod catalog;
pub mod puzzle;

pub use catalog::PuzzleCatalog;
pub use puzzle::{Difficulty, Direction, Puzzle, WordId, WordPlacement};
