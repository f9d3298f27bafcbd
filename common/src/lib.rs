#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod backup;
pub mod crossword;
pub mod cursor;
pub mod game;
pub mod input;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod timer;
pub mod validate;
