use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use util::error::{XWordError, XWordResult};

use crate::{snapshot::SavedGame, stats::Statistics};

pub const BACKUP_VERSION: &str = "1.0.0";

/// Statistics and the saved game bundled into one JSON file, for moving
/// progress between machines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
  pub version: String,
  pub exported_at: DateTime<Utc>,
  #[serde(default)]
  pub statistics: Option<Statistics>,
  #[serde(default)]
  pub saved_game: Option<SavedGame>,
}

impl Backup {
  /// Collects whatever is currently on disk. A saved game is included even
  /// if it is too old to resume.
  pub fn collect(stats_file: &Path, save_file: &Path, now: DateTime<Utc>) -> XWordResult<Self> {
    Ok(Self {
      version: BACKUP_VERSION.to_owned(),
      exported_at: now,
      statistics: Some(Statistics::load(stats_file)?),
      saved_game: SavedGame::read(save_file)?,
    })
  }

  pub fn write(&self, path: impl AsRef<Path>) -> XWordResult {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(self)?)?;
    info!("Exported backup to {}", path.display());
    Ok(())
  }

  pub fn read(path: impl AsRef<Path>) -> XWordResult<Self> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|err| {
      XWordError::Parse(format!("{} is not a backup file: {err}", path.display())).into()
    })
  }

  /// Writes each part present in the bundle over the local copy. Parts that
  /// are absent leave the local files alone.
  pub fn restore(&self, stats_file: &Path, save_file: &Path) -> XWordResult {
    if let Some(stats) = &self.statistics {
      stats.save(stats_file)?;
    }
    if let Some(saved) = &self.saved_game {
      saved.save(save_file)?;
    }
    info!(
      "Imported backup from {} (statistics: {}, saved game: {})",
      self.exported_at,
      self.statistics.is_some(),
      self.saved_game.is_some()
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use std::{collections::BTreeMap, env, fs, path::PathBuf, process};

  use chrono::{NaiveDate, TimeZone, Utc};
  use googletest::prelude::*;
  use util::error::{as_xword_error, XWordError};
  use xword_db::Difficulty;

  use crate::{
    snapshot::{GameSnapshot, SavedGame},
    stats::{GameResult, Statistics},
  };

  use super::Backup;

  fn temp_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("xword-backup-{}-{name}", process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  fn stats() -> Statistics {
    let mut stats = Statistics::new();
    stats.record(
      &GameResult {
        difficulty: Difficulty::medium(),
        puzzle_index: 3,
        completed: true,
        seconds: 120,
        words: 6,
      },
      NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
    );
    stats
  }

  fn saved_game() -> SavedGame {
    SavedGame::new(
      GameSnapshot {
        difficulty: Difficulty::medium(),
        puzzle_index: 4,
        user_input: BTreeMap::from([("0,0".to_owned(), 'Q')]),
        elapsed_seconds: 12,
        completed_words: vec![],
      },
      Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    )
  }

  #[gtest]
  fn test_export_then_import_elsewhere() {
    let home = temp_dir("home");
    let (stats_file, save_file) = (home.join("stats.json"), home.join("save.json"));
    stats().save(&stats_file).unwrap();
    saved_game().save(&save_file).unwrap();

    let now = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    let backup = Backup::collect(&stats_file, &save_file, now).unwrap();
    expect_that!(backup.saved_game, some(eq(&saved_game())));
    let bundle = home.join("backup.json");
    backup.write(&bundle).unwrap();

    let other = temp_dir("other");
    let (other_stats, other_save) = (other.join("stats.json"), other.join("save.json"));
    Backup::read(&bundle).unwrap().restore(&other_stats, &other_save).unwrap();
    expect_eq!(Statistics::load(&other_stats).unwrap(), stats());
    expect_that!(SavedGame::read(&other_save).unwrap(), some(eq(&saved_game())));

    fs::remove_dir_all(&home).unwrap();
    fs::remove_dir_all(&other).unwrap();
  }

  #[gtest]
  fn test_missing_parts_leave_local_files() {
    let dir = temp_dir("partial");
    let (stats_file, save_file) = (dir.join("stats.json"), dir.join("save.json"));
    saved_game().save(&save_file).unwrap();

    let bundle = dir.join("backup.json");
    fs::write(&bundle, r#"{ "version": "1.0.0", "exportedAt": "2025-03-02T00:00:00Z" }"#).unwrap();
    let backup = Backup::read(&bundle).unwrap();
    expect_that!(backup.statistics, none());
    backup.restore(&stats_file, &save_file).unwrap();

    expect_false!(stats_file.exists());
    expect_that!(SavedGame::read(&save_file).unwrap(), some(eq(&saved_game())));
    fs::remove_dir_all(&dir).unwrap();
  }

  #[gtest]
  fn test_bad_backup_is_parse_error() {
    let dir = temp_dir("bad");
    let bundle = dir.join("backup.json");
    fs::write(&bundle, "[1, 2").unwrap();
    let err = Backup::read(&bundle).unwrap_err();
    expect_true!(matches!(as_xword_error(err.as_ref()), Some(XWordError::Parse(_))));
    fs::remove_dir_all(&dir).unwrap();
  }
}
