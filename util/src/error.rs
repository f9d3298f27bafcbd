use core::fmt;
use std::{
  error::Error,
  fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum XWordError {
  Internal(String),
  Parse(String),
  /// A puzzle whose placements cannot be laid out on its grid.
  MalformedPuzzle(String),
  /// The catalog has nothing playable for the requested difficulty.
  NoPuzzleAvailable(String),
  /// A persisted game that failed structural validation.
  InvalidRestoreSnapshot(String),
}

impl Display for XWordError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      XWordError::Internal(msg) => write!(f, "Internal error: {msg}"),
      XWordError::Parse(msg) => write!(f, "Parse error: {msg}"),
      XWordError::MalformedPuzzle(msg) => write!(f, "Malformed puzzle: {msg}"),
      XWordError::NoPuzzleAvailable(difficulty) => {
        write!(f, "No puzzle available for difficulty \"{difficulty}\"")
      }
      XWordError::InvalidRestoreSnapshot(msg) => write!(f, "Invalid saved game: {msg}"),
    }
  }
}

impl Error for XWordError {}

pub type XWordResult<T = ()> = Result<T, Box<dyn Error>>;

/// Returns the `XWordError` behind a boxed error, if that is what it holds.
pub fn as_xword_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a XWordError> {
  err.downcast_ref::<XWordError>()
}
