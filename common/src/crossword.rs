use std::fmt::Display;

use itertools::Itertools;
use log::debug;
use util::{
  error::{XWordError, XWordResult},
  grid::{Grid, Gridlike, MutGridlike},
  pos::Pos,
};
use xword_db::{Puzzle, WordId, WordPlacement};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
  entered: Option<char>,
  /// Absent exactly when the cell is not part of any word.
  solution: Option<char>,
  number: Option<u32>,
  word_ids: Vec<WordId>,
}

impl Cell {
  pub fn playable(&self) -> bool {
    self.solution.is_some()
  }

  pub fn entered(&self) -> Option<char> {
    self.entered
  }

  pub fn solution(&self) -> Option<char> {
    self.solution
  }

  pub fn number(&self) -> Option<u32> {
    self.number
  }

  pub fn word_ids(&self) -> &[WordId] {
    &self.word_ids
  }

  pub fn is_filled(&self) -> bool {
    self.entered.is_some()
  }

  pub fn is_correct(&self) -> bool {
    self.playable() && self.entered == self.solution
  }
}

impl Display for Cell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match (self.solution, self.entered) {
        (None, _) => '*',
        (Some(_), Some(letter)) => letter,
        (Some(_), None) => '_',
      }
    )
  }
}

/// Largest grid side accepted from puzzle data.
pub const MAX_GRID_SIDE: u32 = 1024;

/// The playable grid for one puzzle. Owns every cell; all mutation goes
/// through here.
#[derive(Clone, Debug)]
pub struct Crossword {
  puzzle: Puzzle,
  grid: Grid<Cell>,
}

impl Crossword {
  pub fn build(mut puzzle: Puzzle) -> XWordResult<Self> {
    if puzzle.rows() == 0 || puzzle.cols() == 0 {
      return Err(XWordError::MalformedPuzzle("grid has no cells".to_owned()).into());
    }
    if puzzle.rows() > MAX_GRID_SIDE || puzzle.cols() > MAX_GRID_SIDE {
      return Err(
        XWordError::MalformedPuzzle(format!(
          "{}x{} grid is larger than {MAX_GRID_SIDE}x{MAX_GRID_SIDE}",
          puzzle.rows(),
          puzzle.cols()
        ))
        .into(),
      );
    }
    if let Some(id) = puzzle.words.iter().map(WordPlacement::id).duplicates().next() {
      return Err(XWordError::MalformedPuzzle(format!("word {id} appears twice")).into());
    }

    let mut grid = Grid::new(puzzle.rows(), puzzle.cols());
    for word in puzzle.words.iter_mut() {
      word.solution = word.solution.to_ascii_uppercase();
      Self::place_word(&mut grid, word)?;
    }

    debug!(
      "Built {}x{} crossword with {} words",
      puzzle.rows(),
      puzzle.cols(),
      puzzle.words.len()
    );
    Ok(Self { puzzle, grid })
  }

  fn place_word(grid: &mut Grid<Cell>, word: &WordPlacement) -> XWordResult {
    let id = word.id();
    if word.is_empty() {
      return Err(XWordError::MalformedPuzzle(format!("word {id} is empty")).into());
    }
    let (end_row, end_col) = word.extent();
    if end_row > grid.rows() || end_col > grid.cols() {
      return Err(
        XWordError::MalformedPuzzle(format!("word {id} leaves the grid at {}", word.start()))
          .into(),
      );
    }

    for (idx, (pos, letter)) in word.letters().enumerate() {
      if !letter.is_ascii_alphabetic() {
        return Err(
          XWordError::MalformedPuzzle(format!("word {id} contains non-letter {letter:?}")).into(),
        );
      }
      let cell = grid.get_mut(pos).ok_or_else(|| {
        XWordError::MalformedPuzzle(format!("word {id} leaves the grid at {pos}"))
      })?;

      match cell.solution {
        Some(existing) if existing != letter => {
          return Err(
            XWordError::MalformedPuzzle(format!(
              "word {id} puts {letter} at {pos}, which already holds {existing}"
            ))
            .into(),
          );
        }
        _ => {}
      }
      if let Some(other) = cell
        .word_ids
        .iter()
        .find(|other| other.direction == id.direction)
      {
        return Err(
          XWordError::MalformedPuzzle(format!("words {other} and {id} overlap at {pos}")).into(),
        );
      }

      cell.solution = Some(letter);
      cell.word_ids.push(id);
      if idx == 0 && cell.number.is_none() {
        cell.number = Some(word.number);
      }
    }

    Ok(())
  }

  pub fn puzzle(&self) -> &Puzzle {
    &self.puzzle
  }

  pub fn words(&self) -> &[WordPlacement] {
    &self.puzzle.words
  }

  pub fn word(&self, id: WordId) -> Option<&WordPlacement> {
    self.puzzle.word(id)
  }

  pub fn word_index(&self, id: WordId) -> Option<usize> {
    self.words().iter().position(|word| word.id() == id)
  }

  pub fn grid(&self) -> &Grid<Cell> {
    &self.grid
  }

  pub fn rows(&self) -> u32 {
    self.grid.rows()
  }

  pub fn cols(&self) -> u32 {
    self.grid.cols()
  }

  pub fn in_bounds(&self, pos: Pos) -> bool {
    self.grid.in_bounds(pos)
  }

  pub fn cell(&self, pos: Pos) -> Option<&Cell> {
    self.grid.get(pos)
  }

  pub fn is_playable(&self, pos: Pos) -> bool {
    self.cell(pos).is_some_and(Cell::playable)
  }

  fn playable_cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
    self.grid.get_mut(pos).filter(|cell| cell.playable())
  }

  /// Writes `letter`, uppercased, into a playable cell. Returns false without
  /// touching anything for walls, out-of-bounds positions and non-letters.
  pub fn set_char(&mut self, pos: Pos, letter: char) -> bool {
    if !letter.is_ascii_alphabetic() {
      return false;
    }
    match self.playable_cell_mut(pos) {
      Some(cell) => {
        cell.entered = Some(letter.to_ascii_uppercase());
        true
      }
      None => false,
    }
  }

  pub fn clear_char(&mut self, pos: Pos) -> bool {
    match self.playable_cell_mut(pos) {
      Some(cell) => {
        cell.entered = None;
        true
      }
      None => false,
    }
  }

  pub fn word_cells(&self, word: &WordPlacement) -> Vec<Pos> {
    word.cells().collect()
  }

  /// The entered letters of `word` in order. Unfilled cells contribute
  /// nothing.
  pub fn user_word(&self, word: &WordPlacement) -> String {
    word
      .cells()
      .filter_map(|pos| self.cell(pos).and_then(Cell::entered))
      .collect()
  }

  pub fn clear_all_input(&mut self) {
    self
      .grid
      .iter_mut()
      .for_each(|cell| cell.entered = None);
  }

  /// Every filled cell in reading order.
  pub fn entered_letters(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
    self
      .grid
      .positions()
      .filter_map(|pos| Some((pos, self.cell(pos)?.entered?)))
  }

  pub fn playable_cells(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
    self
      .grid
      .positions()
      .filter_map(|pos| self.cell(pos).filter(|cell| cell.playable()).map(|cell| (pos, cell)))
  }
}

#[cfg(test)]
pub(crate) mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use util::{
    error::{as_xword_error, XWordError},
    pos::Pos,
  };
  use xword_db::{Direction, Puzzle, WordId, WordPlacement};

  use super::Crossword;

  /// CAT across and COW down, sharing the C at (1, 2).
  pub(crate) fn cat_cow() -> Puzzle {
    Puzzle::new(
      6,
      6,
      vec![
        WordPlacement::new("CAT", 1, 2, Direction::Across, "Says meow", 1),
        WordPlacement::new("COW", 1, 2, Direction::Down, "Says moo", 1),
      ],
    )
  }

  fn is_malformed(puzzle: Puzzle) -> bool {
    Crossword::build(puzzle)
      .err()
      .is_some_and(|err| matches!(as_xword_error(err.as_ref()), Some(XWordError::MalformedPuzzle(_))))
  }

  #[gtest]
  fn test_build_marks_word_cells() {
    let xword = Crossword::build(cat_cow()).unwrap();
    for word in xword.words() {
      let cells = xword.word_cells(word);
      expect_eq!(cells.len(), word.len());
      for pos in cells {
        expect_true!(xword.is_playable(pos));
      }
    }
    expect_false!(xword.is_playable(Pos::new(0, 0)));
    expect_false!(xword.is_playable(Pos::new(2, 3)));
  }

  #[gtest]
  fn test_shared_cell_metadata() {
    let xword = Crossword::build(cat_cow()).unwrap();
    let shared = xword.cell(Pos::new(1, 2)).unwrap();
    expect_that!(shared.solution(), some(eq('C')));
    expect_that!(shared.number(), some(eq(1)));
    expect_that!(
      shared.word_ids().to_vec(),
      container_eq([
        WordId::new(Direction::Across, 1),
        WordId::new(Direction::Down, 1)
      ])
    );

    let tail = xword.cell(Pos::new(1, 4)).unwrap();
    expect_that!(tail.number(), none());
    expect_that!(tail.word_ids().to_vec(), container_eq([WordId::new(Direction::Across, 1)]));
  }

  #[gtest]
  fn test_out_of_bounds_is_malformed() {
    let puzzle = Puzzle::new(
      3,
      3,
      vec![WordPlacement::new("LONG", 0, 0, Direction::Across, "", 1)],
    );
    expect_true!(is_malformed(puzzle));
  }

  #[gtest]
  fn test_huge_coordinates_are_malformed() {
    let oversized = Puzzle::new(
      70000,
      70000,
      vec![WordPlacement::new("CAT", 0, 0, Direction::Across, "", 1)],
    );
    expect_true!(is_malformed(oversized));

    let far_away = Puzzle::new(
      5,
      5,
      vec![WordPlacement::new("CAT", u32::MAX, 2_147_483_647, Direction::Down, "", 1)],
    );
    expect_true!(is_malformed(far_away));

    let bare = Puzzle::from_words(
      vec![WordPlacement::new("CAT", u32::MAX, 0, Direction::Across, "", 1)],
      &xword_db::Difficulty::easy(),
    );
    expect_true!(is_malformed(bare));
  }

  #[gtest]
  fn test_inconsistent_puzzles_are_malformed() {
    let conflict = Puzzle::new(
      5,
      5,
      vec![
        WordPlacement::new("CAT", 0, 0, Direction::Across, "", 1),
        WordPlacement::new("DOG", 0, 0, Direction::Down, "", 1),
      ],
    );
    expect_true!(is_malformed(conflict));

    let duplicate_id = Puzzle::new(
      5,
      5,
      vec![
        WordPlacement::new("CAT", 0, 0, Direction::Across, "", 1),
        WordPlacement::new("DOG", 2, 0, Direction::Across, "", 1),
      ],
    );
    expect_true!(is_malformed(duplicate_id));

    let overlapping = Puzzle::new(
      5,
      5,
      vec![
        WordPlacement::new("CAT", 0, 0, Direction::Across, "", 1),
        WordPlacement::new("AT", 0, 1, Direction::Across, "", 2),
      ],
    );
    expect_true!(is_malformed(overlapping));

    let empty = Puzzle::new(5, 5, vec![WordPlacement::new("", 0, 0, Direction::Across, "", 1)]);
    expect_true!(is_malformed(empty));

    expect_true!(is_malformed(Puzzle::new(0, 4, vec![])));
  }

  #[gtest]
  fn test_lowercase_solutions_are_normalized() {
    let puzzle = Puzzle::new(2, 3, vec![WordPlacement::new("cat", 0, 0, Direction::Across, "", 1)]);
    let xword = Crossword::build(puzzle).unwrap();
    expect_eq!(xword.words()[0].solution, "CAT");
    expect_that!(xword.cell(Pos::new(0, 1)).unwrap().solution(), some(eq('A')));
  }

  #[gtest]
  fn test_set_char() {
    let mut xword = Crossword::build(cat_cow()).unwrap();
    expect_true!(xword.set_char(Pos::new(1, 3), 'a'));
    expect_that!(xword.cell(Pos::new(1, 3)).unwrap().entered(), some(eq('A')));

    expect_false!(xword.set_char(Pos::new(0, 0), 'A'));
    expect_that!(xword.cell(Pos::new(0, 0)).unwrap().entered(), none());
    expect_false!(xword.set_char(Pos::new(-1, 3), 'A'));
    expect_false!(xword.set_char(Pos::new(1, 4), '7'));
  }

  #[gtest]
  fn test_user_word_skips_blanks() {
    let mut xword = Crossword::build(cat_cow()).unwrap();
    let cat = xword.words()[0].clone();
    expect_eq!(xword.user_word(&cat), "");
    xword.set_char(Pos::new(1, 2), 'C');
    xword.set_char(Pos::new(1, 4), 'T');
    expect_eq!(xword.user_word(&cat), "CT");
  }

  #[gtest]
  fn test_clear_all_input_is_idempotent() {
    let mut xword = Crossword::build(cat_cow()).unwrap();
    xword.set_char(Pos::new(1, 2), 'C');
    xword.set_char(Pos::new(3, 2), 'W');

    xword.clear_all_input();
    let once = xword.grid().clone();
    xword.clear_all_input();
    expect_true!(once == *xword.grid());
    expect_eq!(xword.entered_letters().count(), 0);
    expect_true!(xword.is_playable(Pos::new(3, 2)));
  }

  #[gtest]
  fn test_display() {
    let mut xword = Crossword::build(Puzzle::new(
      2,
      3,
      vec![WordPlacement::new("AB", 0, 1, Direction::Across, "", 1)],
    ))
    .unwrap();
    xword.set_char(Pos::new(0, 2), 'b');
    expect_eq!(xword.grid().to_string(), "* _ B \n* * * \n");
  }
}
