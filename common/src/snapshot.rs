use std::{collections::BTreeMap, fs, io::ErrorKind, path::Path};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use util::{
  error::{XWordError, XWordResult},
  pos::Pos,
};
use xword_db::{Difficulty, WordId};

pub const SAVE_VERSION: &str = "1.0.0";

/// Saved games older than this are discarded on load.
pub const MAX_SAVE_AGE_DAYS: i64 = 7;

/// Everything needed to resume a game: which puzzle, what was typed, and how
/// long it has been played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
  pub difficulty: Difficulty,
  pub puzzle_index: usize,
  /// Entered letters keyed by `"row,col"`.
  pub user_input: BTreeMap<String, char>,
  pub elapsed_seconds: u64,
  pub completed_words: Vec<WordId>,
}

pub fn cell_key(pos: Pos) -> String {
  format!("{},{}", pos.row, pos.col)
}

pub fn parse_cell_key(key: &str) -> Option<Pos> {
  let (row, col) = key.split_once(',')?;
  Some(Pos::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

/// On-disk envelope around a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
  pub version: String,
  pub saved_at: DateTime<Utc>,
  pub game: GameSnapshot,
}

impl SavedGame {
  pub fn new(game: GameSnapshot, saved_at: DateTime<Utc>) -> Self {
    Self { version: SAVE_VERSION.to_owned(), saved_at, game }
  }

  pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
    now - self.saved_at > Duration::days(MAX_SAVE_AGE_DAYS)
  }

  pub fn save(&self, path: impl AsRef<Path>) -> XWordResult {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(self)?)?;
    debug!("Saved game to {}", path.display());
    Ok(())
  }

  /// Parses a saved game without checking its age. A missing file is
  /// `Ok(None)`.
  pub fn read(path: impl AsRef<Path>) -> XWordResult<Option<Self>> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
      Err(err) => return Err(err.into()),
    };

    let saved = serde_json::from_str(&contents).map_err(|err| {
      XWordError::InvalidRestoreSnapshot(format!("{} is not a saved game: {err}", path.display()))
    })?;
    Ok(Some(saved))
  }

  /// Reads a saved game. A missing file is `Ok(None)`; unreadable or stale
  /// contents are an `InvalidRestoreSnapshot` error.
  pub fn load(path: impl AsRef<Path>, now: DateTime<Utc>) -> XWordResult<Option<Self>> {
    let path = path.as_ref();
    let Some(saved) = Self::read(path)? else {
      return Ok(None);
    };
    if saved.is_stale(now) {
      return Err(
        XWordError::InvalidRestoreSnapshot(format!(
          "saved game from {} is more than {MAX_SAVE_AGE_DAYS} days old",
          saved.saved_at
        ))
        .into(),
      );
    }

    info!("Loaded saved game from {}", path.display());
    Ok(Some(saved))
  }

  pub fn remove(path: impl AsRef<Path>) -> XWordResult {
    match fs::remove_file(path) {
      Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
      _ => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use std::{collections::BTreeMap, env, fs, path::PathBuf, process};

  use chrono::{Duration, TimeZone, Utc};
  use googletest::prelude::*;
  use util::{
    error::{as_xword_error, XWordError},
    pos::Pos,
  };
  use xword_db::{Difficulty, Direction, WordId};

  use super::{cell_key, parse_cell_key, GameSnapshot, SavedGame};

  fn snapshot() -> GameSnapshot {
    GameSnapshot {
      difficulty: Difficulty::easy(),
      puzzle_index: 1,
      user_input: BTreeMap::from([("1,2".to_owned(), 'C'), ("1,3".to_owned(), 'A')]),
      elapsed_seconds: 93,
      completed_words: vec![WordId::new(Direction::Across, 1)],
    }
  }

  fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("xword-snapshot-{}-{name}.json", process::id()))
  }

  #[gtest]
  fn test_cell_keys() {
    expect_eq!(cell_key(Pos::new(3, 12)), "3,12");
    expect_that!(parse_cell_key("3,12"), some(eq(Pos::new(3, 12))));
    expect_that!(parse_cell_key("3;12"), none());
    expect_that!(parse_cell_key("a,1"), none());
  }

  #[gtest]
  fn test_json_shape() {
    let json = serde_json::to_value(snapshot()).unwrap();
    expect_eq!(json["difficulty"].as_str(), Some("easy"));
    expect_eq!(json["puzzleIndex"].as_u64(), Some(1));
    expect_eq!(json["userInput"]["1,2"].as_str(), Some("C"));
    expect_eq!(json["completedWords"][0].as_str(), Some("H1"));
  }

  #[gtest]
  fn test_save_and_load() {
    let path = temp_path("round-trip");
    let now = Utc.with_ymd_and_hms(2025, 2, 14, 12, 0, 0).unwrap();
    let saved = SavedGame::new(snapshot(), now);
    saved.save(&path).unwrap();

    let loaded = SavedGame::load(&path, now + Duration::days(1)).unwrap();
    expect_that!(loaded, some(eq(&saved)));

    SavedGame::remove(&path).unwrap();
    expect_that!(SavedGame::load(&path, now).unwrap(), none());
  }

  #[gtest]
  fn test_stale_and_corrupt_files_rejected() {
    let path = temp_path("stale");
    let then = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
    SavedGame::new(snapshot(), then).save(&path).unwrap();
    let err = SavedGame::load(&path, then + Duration::days(8)).unwrap_err();
    expect_true!(matches!(
      as_xword_error(err.as_ref()),
      Some(XWordError::InvalidRestoreSnapshot(_))
    ));
    expect_that!(SavedGame::read(&path).unwrap(), some(anything()));

    fs::write(&path, "{ not json").unwrap();
    let err = SavedGame::load(&path, then).unwrap_err();
    expect_true!(matches!(
      as_xword_error(err.as_ref()),
      Some(XWordError::InvalidRestoreSnapshot(_))
    ));
    SavedGame::remove(&path).unwrap();
  }
}
