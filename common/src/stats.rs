use std::{
  collections::{BTreeMap, BTreeSet},
  fs,
  io::ErrorKind,
  path::Path,
};

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use util::error::XWordResult;
use xword_db::Difficulty;

/// How one game ended, as far as statistics care.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
  pub difficulty: Difficulty,
  pub puzzle_index: usize,
  pub completed: bool,
  pub seconds: u64,
  pub words: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
  pub current: u32,
  pub best: u32,
  pub last_play_date: Option<NaiveDate>,
}

impl Streaks {
  /// A win the day after the last play extends the streak and a second win
  /// on the same day leaves it alone. Any other win starts over at 1, and a
  /// loss drops it to 0.
  fn update(&mut self, won: bool, today: NaiveDate) {
    if won {
      if self.last_play_date != Some(today) {
        let consecutive = self
          .last_play_date
          .and_then(|last| last.succ_opt())
          .is_some_and(|next| next == today);
        self.current = if consecutive { self.current + 1 } else { 1 };
      }
      self.best = self.best.max(self.current);
    } else {
      self.current = 0;
    }
    self.last_play_date = Some(today);
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
  pub total_games_played: u32,
  pub total_games_completed: u32,
  pub total_words_completed: u64,
  pub total_time_played: u64,
  pub best_times: BTreeMap<Difficulty, u64>,
  pub streaks: Streaks,
  pub completed_puzzles: BTreeMap<Difficulty, BTreeSet<usize>>,
}

impl Statistics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&mut self, result: &GameResult, today: NaiveDate) {
    self.total_games_played += 1;
    self.total_time_played += result.seconds;

    if result.completed {
      self.total_games_completed += 1;
      self.total_words_completed += result.words as u64;

      let best = self.best_times.entry(result.difficulty.clone()).or_insert(result.seconds);
      *best = (*best).min(result.seconds);

      self
        .completed_puzzles
        .entry(result.difficulty.clone())
        .or_default()
        .insert(result.puzzle_index);
    }

    self.streaks.update(result.completed, today);
    debug!(
      "Recorded {} {} game in {}s, streak now {}",
      if result.completed { "completed" } else { "abandoned" },
      result.difficulty,
      result.seconds,
      self.streaks.current
    );
  }

  pub fn best_time(&self, difficulty: &Difficulty) -> Option<u64> {
    self.best_times.get(difficulty).copied()
  }

  pub fn is_puzzle_completed(&self, difficulty: &Difficulty, index: usize) -> bool {
    self
      .completed_puzzles
      .get(difficulty)
      .is_some_and(|indices| indices.contains(&index))
  }

  pub fn completed_count(&self, difficulty: &Difficulty) -> usize {
    self.completed_puzzles.get(difficulty).map_or(0, BTreeSet::len)
  }

  /// Zeroes totals, best times and streaks. Solved puzzles stay marked.
  pub fn reset(&mut self) {
    let completed_puzzles = std::mem::take(&mut self.completed_puzzles);
    *self = Self { completed_puzzles, ..Self::default() };
    info!("Statistics reset");
  }

  /// Loads statistics, starting fresh if the file is missing or unreadable.
  pub fn load(path: impl AsRef<Path>) -> XWordResult<Self> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
      Err(err) => return Err(err.into()),
    };
    match serde_json::from_str(&contents) {
      Ok(stats) => Ok(stats),
      Err(err) => {
        warn!("Ignoring corrupt statistics in {}: {err}", path.display());
        Ok(Self::default())
      }
    }
  }

  pub fn save(&self, path: impl AsRef<Path>) -> XWordResult {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(self)?)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use std::{env, fs, process};

  use chrono::NaiveDate;
  use googletest::prelude::*;
  use xword_db::Difficulty;

  use super::{GameResult, Statistics};

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
  }

  fn win(seconds: u64) -> GameResult {
    GameResult {
      difficulty: Difficulty::easy(),
      puzzle_index: 0,
      completed: true,
      seconds,
      words: 4,
    }
  }

  fn loss() -> GameResult {
    GameResult { completed: false, ..win(50) }
  }

  #[gtest]
  fn test_totals_and_best_time() {
    let mut stats = Statistics::new();
    stats.record(&win(120), day(1));
    stats.record(&win(90), day(1));
    stats.record(&loss(), day(1));
    stats.record(&win(200), day(1));

    expect_eq!(stats.total_games_played, 4);
    expect_eq!(stats.total_games_completed, 3);
    expect_eq!(stats.total_words_completed, 12);
    expect_eq!(stats.total_time_played, 460);
    expect_that!(stats.best_time(&Difficulty::easy()), some(eq(90)));
    expect_that!(stats.best_time(&Difficulty::hard()), none());
  }

  #[gtest]
  fn test_streaks() {
    let mut stats = Statistics::new();
    stats.record(&win(10), day(1));
    expect_eq!(stats.streaks.current, 1);

    stats.record(&win(10), day(1));
    expect_eq!(stats.streaks.current, 1);

    stats.record(&win(10), day(2));
    stats.record(&win(10), day(3));
    expect_eq!(stats.streaks.current, 3);
    expect_eq!(stats.streaks.best, 3);

    stats.record(&win(10), day(5));
    expect_eq!(stats.streaks.current, 1);

    stats.record(&loss(), day(5));
    expect_eq!(stats.streaks.current, 0);
    expect_eq!(stats.streaks.best, 3);
    expect_that!(stats.streaks.last_play_date, some(eq(day(5))));
  }

  #[gtest]
  fn test_completed_puzzles() {
    let mut stats = Statistics::new();
    stats.record(&GameResult { puzzle_index: 2, ..win(10) }, day(1));
    stats.record(&GameResult { puzzle_index: 2, ..win(10) }, day(1));
    stats.record(&GameResult { puzzle_index: 5, ..loss() }, day(1));

    expect_true!(stats.is_puzzle_completed(&Difficulty::easy(), 2));
    expect_false!(stats.is_puzzle_completed(&Difficulty::easy(), 5));
    expect_eq!(stats.completed_count(&Difficulty::easy()), 1);
  }

  #[gtest]
  fn test_reset_keeps_solved_puzzles() {
    let mut stats = Statistics::new();
    stats.record(&GameResult { puzzle_index: 2, ..win(40) }, day(1));
    stats.record(&win(25), day(2));
    stats.record(&loss(), day(3));

    stats.reset();
    expect_eq!(stats.total_games_played, 0);
    expect_eq!(stats.total_games_completed, 0);
    expect_eq!(stats.total_time_played, 0);
    expect_that!(stats.best_time(&Difficulty::easy()), none());
    expect_eq!(stats.streaks.best, 0);
    expect_that!(stats.streaks.last_play_date, none());
    expect_true!(stats.is_puzzle_completed(&Difficulty::easy(), 2));
  }

  #[gtest]
  fn test_save_and_load() {
    let path = env::temp_dir().join(format!("xword-stats-{}.json", process::id()));
    let mut stats = Statistics::new();
    stats.record(&win(33), day(4));
    stats.save(&path).unwrap();
    expect_eq!(Statistics::load(&path).unwrap(), stats);

    fs::write(&path, "{ corrupt").unwrap();
    expect_eq!(Statistics::load(&path).unwrap(), Statistics::new());

    fs::remove_file(&path).unwrap();
    expect_eq!(Statistics::load(&path).unwrap(), Statistics::new());
  }
}
