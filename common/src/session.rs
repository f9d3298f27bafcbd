use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use rand::Rng;
use util::error::{as_xword_error, XWordError, XWordResult};
use xword_db::{Difficulty, PuzzleCatalog};

use crate::{
  game::{Game, GameOptions},
  snapshot::GameSnapshot,
  stats::{GameResult, Statistics},
};

fn local_today() -> NaiveDate {
  Local::now().date_naive()
}

/// Owns the catalog and whichever game is being played. Every replacement of
/// the game bumps `generation`, so work started for an older game can tell it
/// has been superseded.
pub struct Session {
  catalog: PuzzleCatalog,
  game: Option<Game>,
  stats: Statistics,
  options: GameOptions,
  generation: u64,
  /// Whether the current game's outcome is already in `stats`.
  recorded: bool,
  stats_changed: bool,
  today: fn() -> NaiveDate,
}

impl Session {
  pub fn new(catalog: PuzzleCatalog, stats: Statistics, options: GameOptions) -> Self {
    Self {
      catalog,
      game: None,
      stats,
      options,
      generation: 0,
      recorded: false,
      stats_changed: false,
      today: local_today,
    }
  }

  /// Replaces the calendar used to date statistics.
  pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
    self.today = today;
    self
  }

  pub fn catalog(&self) -> &PuzzleCatalog {
    &self.catalog
  }

  pub fn game(&self) -> Option<&Game> {
    self.game.as_ref()
  }

  pub fn stats(&self) -> &Statistics {
    &self.stats
  }

  pub fn options(&self) -> GameOptions {
    self.options
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// True once after each change to the statistics.
  pub fn take_stats_changed(&mut self) -> bool {
    std::mem::take(&mut self.stats_changed)
  }

  pub fn new_game(&mut self, difficulty: &Difficulty) -> XWordResult<u64> {
    self.new_game_with(difficulty, &mut rand::rng())
  }

  /// Starts a random puzzle of `difficulty`. Puzzles that fail to build are
  /// skipped in favor of the rest of the pool.
  pub fn new_game_with<R: Rng + ?Sized>(
    &mut self,
    difficulty: &Difficulty,
    rng: &mut R,
  ) -> XWordResult<u64> {
    for index in self.catalog.random_order(difficulty, rng) {
      match self.build_game(difficulty, index) {
        Ok(game) => return Ok(self.install(game)),
        Err(err)
          if matches!(as_xword_error(err.as_ref()), Some(XWordError::MalformedPuzzle(_))) =>
        {
          warn!("Skipping {difficulty} puzzle #{index}: {err}");
        }
        Err(err) => return Err(err),
      }
    }
    Err(XWordError::NoPuzzleAvailable(difficulty.to_string()).into())
  }

  /// Starts a specific puzzle.
  pub fn start_puzzle(&mut self, difficulty: &Difficulty, index: usize) -> XWordResult<u64> {
    let game = self.build_game(difficulty, index)?;
    Ok(self.install(game))
  }

  pub fn restore(&mut self, snapshot: &GameSnapshot) -> XWordResult<u64> {
    let game = Game::restore(&self.catalog, snapshot, self.options)?;
    Ok(self.install(game))
  }

  fn build_game(&self, difficulty: &Difficulty, index: usize) -> XWordResult<Game> {
    let puzzle = self
      .catalog
      .get_by_index(difficulty, index)
      .ok_or_else(|| XWordError::NoPuzzleAvailable(format!("{difficulty} #{index}")))?;
    Game::new(difficulty.clone(), index, puzzle.clone(), self.options)
  }

  fn install(&mut self, game: Game) -> u64 {
    self.abandon_current();
    self.recorded = game.is_complete();
    self.game = Some(game);
    self.generation += 1;
    debug!("Session generation now {}", self.generation);
    self.generation
  }

  /// An unfinished game with letters in it counts as a loss when it is
  /// thrown away.
  fn abandon_current(&mut self) {
    let Some(game) = self.game.take() else {
      return;
    };
    if self.recorded || game.crossword().entered_letters().next().is_none() {
      return;
    }
    info!("Abandoning {} puzzle #{}", game.difficulty(), game.puzzle_index());
    self.record(&game, false);
  }

  fn record(&mut self, game: &Game, completed: bool) {
    let result = GameResult {
      difficulty: game.difficulty().clone(),
      puzzle_index: game.puzzle_index(),
      completed,
      seconds: game.timer().seconds(),
      words: game.progress().1,
    };
    self.stats.record(&result, (self.today)());
    self.stats_changed = true;
  }

  /// Runs `f` on the current game, then records the result if that finished
  /// it. `None` when no game is running.
  pub fn with_game<T, F>(&mut self, f: F) -> Option<T>
  where
    F: FnOnce(&mut Game) -> T,
  {
    let mut game = self.game.take()?;
    let result = f(&mut game);
    if game.is_complete() && !self.recorded {
      self.recorded = true;
      self.record(&game, true);
    }
    self.game = Some(game);
    Some(result)
  }

  /// Advances the clock of the game started at `generation`. Ticks for any
  /// other generation are dropped.
  pub fn tick(&mut self, generation: u64) -> bool {
    if generation != self.generation {
      debug!("Dropping tick for stale generation {generation}");
      return false;
    }
    self.game.as_mut().is_some_and(Game::tick)
  }

  pub fn snapshot(&self) -> Option<GameSnapshot> {
    self.game.as_ref().map(Game::snapshot)
  }
}
