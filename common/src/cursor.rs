use util::pos::{Diff, Pos};
use xword_db::{Direction, WordId, WordPlacement};

use crate::crossword::Crossword;

/// Selection state over a `Crossword`. The cursor never owns grid data; every
/// operation borrows the crossword it moves over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
  pos: Option<Pos>,
  direction: Direction,
  /// Index into the crossword's word list.
  active: Option<usize>,
}

impl Default for Cursor {
  fn default() -> Self {
    Self::new()
  }
}

impl Cursor {
  pub fn new() -> Self {
    Self { pos: None, direction: Direction::Across, active: None }
  }

  pub fn pos(&self) -> Option<Pos> {
    self.pos
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  pub fn active_index(&self) -> Option<usize> {
    self.active
  }

  pub fn active_word<'a>(&self, xword: &'a Crossword) -> Option<&'a WordPlacement> {
    self.active.and_then(|idx| xword.words().get(idx))
  }

  pub fn active_id(&self, xword: &Crossword) -> Option<WordId> {
    self.active_word(xword).map(WordPlacement::id)
  }

  /// Selects `pos`, or flips direction when `pos` is already selected.
  /// Returns false, changing nothing, if `pos` is not playable.
  pub fn select_cell(&mut self, pos: Pos, xword: &Crossword) -> bool {
    if !xword.is_playable(pos) {
      return false;
    }

    if self.pos == Some(pos) {
      self.direction = self.direction.opposite();
    } else {
      self.pos = Some(pos);
    }
    self.resolve_active_word(xword);
    true
  }

  fn find_word(xword: &Crossword, pos: Pos, direction: Direction) -> Option<usize> {
    xword
      .words()
      .iter()
      .position(|word| word.direction == direction && word.contains(pos))
  }

  /// Points the active word at the word through the current cell, preferring
  /// the current direction and switching direction if only the other one has
  /// a word here.
  pub fn resolve_active_word(&mut self, xword: &Crossword) {
    let Some(pos) = self.pos else {
      self.active = None;
      return;
    };

    if let Some(idx) = Self::find_word(xword, pos, self.direction) {
      self.active = Some(idx);
    } else if let Some(idx) = Self::find_word(xword, pos, self.direction.opposite()) {
      self.direction = self.direction.opposite();
      self.active = Some(idx);
    } else {
      self.active = None;
    }
  }

  /// Moves one cell along the current direction. Stops dead at walls and the
  /// grid edge rather than searching past them.
  pub fn step(&mut self, delta: i32, xword: &Crossword) -> bool {
    let Some(pos) = self.pos else {
      return false;
    };

    let next = pos + delta * self.direction.diff();
    if !xword.is_playable(next) {
      return false;
    }
    self.pos = Some(next);
    self.resolve_active_word(xword);
    true
  }

  /// Scans from the current cell in the direction of `diff` for the next
  /// playable cell, skipping walls. The direction follows the axis of
  /// movement.
  pub fn move_arrow(&mut self, diff: Diff, xword: &Crossword) -> bool {
    let Some(start) = self.pos else {
      return false;
    };
    if diff.is_zero() {
      return false;
    }

    let target = (1..)
      .map(|dist| start + dist * diff)
      .take_while(|&pos| xword.in_bounds(pos))
      .find(|&pos| xword.is_playable(pos));

    match target {
      Some(pos) => {
        self.pos = Some(pos);
        self.direction = if diff.row != 0 { Direction::Down } else { Direction::Across };
        self.resolve_active_word(xword);
        true
      }
      None => false,
    }
  }

  /// Selects the start of word `idx` in its own direction.
  pub fn jump_to_index(&mut self, idx: usize, xword: &Crossword) -> bool {
    let Some(word) = xword.words().get(idx) else {
      return false;
    };
    self.pos = Some(word.start());
    self.direction = word.direction;
    self.active = Some(idx);
    true
  }

  pub fn jump_to_word(&mut self, id: WordId, xword: &Crossword) -> bool {
    xword
      .word_index(id)
      .is_some_and(|idx| self.jump_to_index(idx, xword))
  }

  /// Jumps to the following word in puzzle order, wrapping after the last.
  pub fn next_word(&mut self, xword: &Crossword) -> bool {
    let count = xword.words().len();
    if count == 0 {
      return false;
    }
    let next = match self.active {
      Some(idx) if idx + 1 < count => idx + 1,
      _ => 0,
    };
    self.jump_to_index(next, xword)
  }

  /// Jumps to the preceding word in puzzle order, wrapping before the first.
  pub fn prev_word(&mut self, xword: &Crossword) -> bool {
    let count = xword.words().len();
    if count == 0 {
      return false;
    }
    let prev = match self.active {
      Some(idx) if idx > 0 => idx - 1,
      _ => count - 1,
    };
    self.jump_to_index(prev, xword)
  }

  pub fn toggle_direction(&mut self, xword: &Crossword) -> bool {
    if self.pos.is_none() {
      return false;
    }
    self.direction = self.direction.opposite();
    self.resolve_active_word(xword);
    true
  }
}
