use std::collections::HashSet;

use log::{debug, info, warn};
use util::{
  error::{XWordError, XWordResult},
  pos::Pos,
};
use xword_db::{Difficulty, Puzzle, PuzzleCatalog, WordId};

use crate::{
  crossword::Crossword,
  cursor::Cursor,
  input::Key,
  snapshot::{cell_key, parse_cell_key, GameSnapshot},
  timer::Timer,
  validate::{check_puzzle, check_word, is_fully_filled, PuzzleCheck},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOptions {
  /// Run `check` as soon as every playable cell is filled.
  pub auto_check: bool,
}

impl Default for GameOptions {
  fn default() -> Self {
    Self { auto_check: false }
  }
}

/// Things that happened in a game since the last `take_events`, for
/// whatever presents them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
  SelectionChanged,
  CellInput { pos: Pos, letter: Option<char> },
  WordCompleted(WordId),
  PuzzleCompleted { seconds: u64, words: usize },
}

/// One puzzle being played: its grid, the cursor over it and the clock.
#[derive(Clone, Debug)]
pub struct Game {
  difficulty: Difficulty,
  puzzle_index: usize,
  xword: Crossword,
  cursor: Cursor,
  timer: Timer,
  options: GameOptions,
  completed_words: HashSet<WordId>,
  complete: bool,
  events: Vec<GameEvent>,
}

impl Game {
  pub fn new(
    difficulty: Difficulty,
    puzzle_index: usize,
    puzzle: Puzzle,
    options: GameOptions,
  ) -> XWordResult<Self> {
    let xword = Crossword::build(puzzle)?;
    let mut game = Self {
      difficulty,
      puzzle_index,
      xword,
      cursor: Cursor::new(),
      timer: Timer::new(),
      options,
      completed_words: HashSet::new(),
      complete: false,
      events: Vec::new(),
    };
    game.cursor.jump_to_index(0, &game.xword);
    game.timer.start();
    info!(
      "Started {} puzzle #{} ({} words)",
      game.difficulty,
      game.puzzle_index,
      game.xword.words().len()
    );
    Ok(game)
  }

  /// Rebuilds a game from a snapshot against the catalog it was taken from.
  /// Letters on cells that are not playable in the puzzle are dropped;
  /// completed words are recomputed from the restored letters.
  pub fn restore(
    catalog: &PuzzleCatalog,
    snapshot: &GameSnapshot,
    options: GameOptions,
  ) -> XWordResult<Self> {
    let puzzle = catalog
      .get_by_index(&snapshot.difficulty, snapshot.puzzle_index)
      .ok_or_else(|| {
        XWordError::InvalidRestoreSnapshot(format!(
          "no {} puzzle #{}",
          snapshot.difficulty, snapshot.puzzle_index
        ))
      })?;

    let mut game = Self::new(
      snapshot.difficulty.clone(),
      snapshot.puzzle_index,
      puzzle.clone(),
      options,
    )?;

    for (key, &letter) in &snapshot.user_input {
      let pos = parse_cell_key(key).ok_or_else(|| {
        XWordError::InvalidRestoreSnapshot(format!("bad cell key \"{key}\""))
      })?;
      if !letter.is_ascii_alphabetic() {
        return Err(
          XWordError::InvalidRestoreSnapshot(format!("bad letter '{letter}' at {key}")).into(),
        );
      }
      if !game.xword.set_char(pos, letter) {
        warn!("Dropping saved letter at {pos}, not a playable cell");
      }
    }

    game.timer = Timer::with_seconds(snapshot.elapsed_seconds);
    let check = check_puzzle(&game.xword);
    game.completed_words = check.correct_ids().collect();
    if check.all_correct {
      game.complete = true;
    } else {
      game.timer.start();
    }
    game.events.clear();
    Ok(game)
  }

  pub fn snapshot(&self) -> GameSnapshot {
    GameSnapshot {
      difficulty: self.difficulty.clone(),
      puzzle_index: self.puzzle_index,
      user_input: self
        .xword
        .entered_letters()
        .map(|(pos, letter)| (cell_key(pos), letter))
        .collect(),
      elapsed_seconds: self.timer.seconds(),
      completed_words: self.completed_words(),
    }
  }

  pub fn difficulty(&self) -> &Difficulty {
    &self.difficulty
  }

  pub fn puzzle_index(&self) -> usize {
    self.puzzle_index
  }

  pub fn crossword(&self) -> &Crossword {
    &self.xword
  }

  pub fn cursor(&self) -> &Cursor {
    &self.cursor
  }

  pub fn timer(&self) -> &Timer {
    &self.timer
  }

  pub fn options(&self) -> GameOptions {
    self.options
  }

  pub fn is_complete(&self) -> bool {
    self.complete
  }

  pub fn take_events(&mut self) -> Vec<GameEvent> {
    std::mem::take(&mut self.events)
  }

  /// Correct words in puzzle order.
  pub fn completed_words(&self) -> Vec<WordId> {
    self
      .xword
      .words()
      .iter()
      .map(|word| word.id())
      .filter(|id| self.completed_words.contains(id))
      .collect()
  }

  /// `(completed words, total words)`.
  pub fn progress(&self) -> (usize, usize) {
    (self.completed_words.len(), self.xword.words().len())
  }

  pub fn tick(&mut self) -> bool {
    self.timer.tick()
  }

  fn track_selection<F>(&mut self, f: F) -> bool
  where
    F: FnOnce(&mut Cursor, &Crossword) -> bool,
  {
    let before = self.cursor.clone();
    let moved = f(&mut self.cursor, &self.xword);
    if self.cursor != before {
      self.events.push(GameEvent::SelectionChanged);
    }
    moved
  }

  pub fn pointer_select(&mut self, pos: Pos) -> bool {
    self.track_selection(|cursor, xword| cursor.select_cell(pos, xword))
  }

  /// Clue-list selection.
  pub fn select_word(&mut self, id: WordId) -> bool {
    self.track_selection(|cursor, xword| cursor.jump_to_word(id, xword))
  }

  /// Applies one key. Keys are ignored once the puzzle is solved or while
  /// nothing is selected. Returns whether anything changed.
  pub fn keypress(&mut self, key: Key) -> bool {
    if self.complete {
      return false;
    }
    let Some(pos) = self.cursor.pos() else {
      return false;
    };

    match key {
      Key::Char(' ') | Key::Space => {
        self.track_selection(|cursor, xword| cursor.toggle_direction(xword))
      }
      Key::Char(letter) if letter.is_ascii_alphabetic() => {
        if !self.write_cell(pos, Some(letter)) {
          return false;
        }
        self.track_selection(|cursor, xword| cursor.step(1, xword));
        self.after_input();
        true
      }
      Key::Char(_) => false,
      Key::Backspace => {
        if self.is_filled(pos) {
          self.write_cell(pos, None);
        } else if self.track_selection(|cursor, xword| cursor.step(-1, xword)) {
          if let Some(prev) = self.cursor.pos().filter(|&prev| self.is_filled(prev)) {
            self.write_cell(prev, None);
          }
        } else {
          return false;
        }
        self.after_input();
        true
      }
      Key::Delete => {
        let cleared = self.is_filled(pos) && self.write_cell(pos, None);
        if cleared {
          self.after_input();
        }
        cleared
      }
      Key::Left | Key::Right | Key::Up | Key::Down => match key.arrow_diff() {
        Some(diff) => self.track_selection(|cursor, xword| cursor.move_arrow(diff, xword)),
        None => false,
      },
      Key::Tab => self.track_selection(|cursor, xword| cursor.next_word(xword)),
      Key::BackTab => self.track_selection(|cursor, xword| cursor.prev_word(xword)),
    }
  }

  /// Fills the selected cell with its solution letter, unless it already
  /// holds it, and advances like a typed letter.
  pub fn reveal_letter(&mut self) -> bool {
    if self.complete {
      return false;
    }
    let Some(pos) = self.cursor.pos() else {
      return false;
    };
    let Some(solution) = self
      .xword
      .cell(pos)
      .filter(|cell| !cell.is_correct())
      .and_then(|cell| cell.solution())
    else {
      return false;
    };

    debug!("Revealing {solution} at {pos}");
    self.write_cell(pos, Some(solution));
    self.track_selection(|cursor, xword| cursor.step(1, xword));
    self.after_input();
    true
  }

  /// Validates the whole grid. A fully correct grid completes the game.
  pub fn check(&mut self) -> PuzzleCheck {
    let check = check_puzzle(&self.xword);
    for id in check.correct_ids() {
      if self.completed_words.insert(id) {
        self.events.push(GameEvent::WordCompleted(id));
      }
    }

    if check.all_correct && !self.complete {
      self.complete = true;
      self.timer.pause();
      info!(
        "Completed {} puzzle #{} in {}s",
        self.difficulty,
        self.puzzle_index,
        self.timer.seconds()
      );
      self.events.push(GameEvent::PuzzleCompleted {
        seconds: self.timer.seconds(),
        words: check.total(),
      });
    }
    check
  }

  /// Clears all input and restarts the clock on the same puzzle.
  pub fn reset(&mut self) {
    self.xword.clear_all_input();
    self.completed_words.clear();
    self.complete = false;
    self.timer.reset();
    self.timer.start();
    self.cursor = Cursor::new();
    self.cursor.jump_to_index(0, &self.xword);
    self.events.push(GameEvent::SelectionChanged);
    debug!("Reset {} puzzle #{}", self.difficulty, self.puzzle_index);
  }

  fn is_filled(&self, pos: Pos) -> bool {
    self.xword.cell(pos).is_some_and(|cell| cell.is_filled())
  }

  fn write_cell(&mut self, pos: Pos, letter: Option<char>) -> bool {
    let written = match letter {
      Some(letter) => self.xword.set_char(pos, letter),
      None => self.xword.clear_char(pos),
    };
    if !written {
      return false;
    }

    let letter = self.xword.cell(pos).and_then(|cell| cell.entered());
    self.events.push(GameEvent::CellInput { pos, letter });
    self.refresh_words_at(pos);
    true
  }

  fn refresh_words_at(&mut self, pos: Pos) {
    let ids = self
      .xword
      .cell(pos)
      .map(|cell| cell.word_ids().to_vec())
      .unwrap_or_default();

    for id in ids {
      let Some(word) = self.xword.word(id) else {
        continue;
      };
      if check_word(word, &self.xword) {
        if self.completed_words.insert(id) {
          self.events.push(GameEvent::WordCompleted(id));
        }
      } else {
        self.completed_words.remove(&id);
      }
    }
  }

  fn after_input(&mut self) {
    if self.options.auto_check && is_fully_filled(&self.xword) {
      self.check();
    }
  }
}
