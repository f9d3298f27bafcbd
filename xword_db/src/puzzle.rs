use std::{cmp::Ordering, fmt::Display, str::FromStr};

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use util::{
  error::XWordError,
  pos::{Diff, Pos},
};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode)]
pub enum Direction {
  #[serde(rename = "H")]
  Across,
  #[serde(rename = "V")]
  Down,
}

impl Direction {
  pub const fn opposite(self) -> Self {
    match self {
      Self::Across => Self::Down,
      Self::Down => Self::Across,
    }
  }

  pub const fn diff(self) -> Diff {
    match self {
      Self::Across => Diff::RIGHT,
      Self::Down => Diff::DOWN,
    }
  }

  /// The single-letter code used in puzzle files and saved games.
  pub const fn code(self) -> char {
    match self {
      Self::Across => 'H',
      Self::Down => 'V',
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Across => write!(f, "Across"),
      Self::Down => write!(f, "Down"),
    }
  }
}

/// Identifies a word within one puzzle. Written as `H<number>` or
/// `V<number>`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WordId {
  pub direction: Direction,
  pub number: u32,
}

impl WordId {
  pub const fn new(direction: Direction, number: u32) -> Self {
    Self { direction, number }
  }
}

impl Display for WordId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}{}", self.direction.code(), self.number)
  }
}

impl FromStr for WordId {
  type Err = XWordError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut chars = s.chars();
    let direction = match chars.next() {
      Some('H') => Direction::Across,
      Some('V') => Direction::Down,
      _ => return Err(XWordError::Parse(format!("Bad word id direction in \"{s}\""))),
    };
    let number = chars
      .as_str()
      .parse()
      .map_err(|err| XWordError::Parse(format!("Bad word id number in \"{s}\": {err}")))?;
    Ok(Self { direction, number })
  }
}

impl TryFrom<String> for WordId {
  type Error = XWordError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<WordId> for String {
  fn from(value: WordId) -> Self {
    value.to_string()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct WordPlacement {
  #[serde(rename = "w")]
  pub solution: String,
  #[serde(rename = "r")]
  pub row: u32,
  #[serde(rename = "c")]
  pub col: u32,
  #[serde(rename = "d")]
  pub direction: Direction,
  #[serde(rename = "h", default)]
  pub clue: String,
  #[serde(rename = "n")]
  pub number: u32,
}

impl WordPlacement {
  pub fn new(
    solution: &str,
    row: u32,
    col: u32,
    direction: Direction,
    clue: &str,
    number: u32,
  ) -> Self {
    Self {
      solution: solution.to_owned(),
      row,
      col,
      direction,
      clue: clue.to_owned(),
      number,
    }
  }

  pub fn id(&self) -> WordId {
    WordId { direction: self.direction, number: self.number }
  }

  pub fn start(&self) -> Pos {
    Pos { row: self.row as i32, col: self.col as i32 }
  }

  pub fn len(&self) -> usize {
    self.solution.chars().count()
  }

  pub fn is_empty(&self) -> bool {
    self.solution.is_empty()
  }

  /// Every position the word occupies, paired with its solution letter.
  pub fn letters(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
    let start = self.start();
    let step = self.direction.diff();
    self
      .solution
      .chars()
      .enumerate()
      .map(move |(idx, letter)| (start + idx as i32 * step, letter))
  }

  pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
    self.letters().map(|(pos, _)| pos)
  }

  pub fn contains(&self, pos: Pos) -> bool {
    let offset = pos - self.start();
    let (along, across) = match self.direction {
      Direction::Across => (offset.col, offset.row),
      Direction::Down => (offset.row, offset.col),
    };
    across == 0 && (0..self.len() as i32).contains(&along)
  }

  /// One past the last occupied row and column, saturating at `u32::MAX`.
  pub fn extent(&self) -> (u32, u32) {
    let len = u32::try_from(self.len()).unwrap_or(u32::MAX);
    match self.direction {
      Direction::Across => (self.row.saturating_add(1), self.col.saturating_add(len)),
      Direction::Down => (self.row.saturating_add(len), self.col.saturating_add(1)),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct GridSize {
  pub rows: u32,
  pub cols: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Puzzle {
  #[serde(rename = "gridSize")]
  pub grid_size: GridSize,
  pub words: Vec<WordPlacement>,
}

impl Puzzle {
  pub fn new(rows: u32, cols: u32, words: Vec<WordPlacement>) -> Self {
    Self { grid_size: GridSize { rows, cols }, words }
  }

  /// Builds a puzzle from a bare word list, sizing the grid by difficulty and
  /// growing it until every word fits.
  pub fn from_words(words: Vec<WordPlacement>, difficulty: &Difficulty) -> Self {
    let base = difficulty.default_grid_len();
    let (rows, cols) = words
      .iter()
      .map(WordPlacement::extent)
      .fold((base, base), |(rows, cols), (r, c)| (rows.max(r), cols.max(c)));
    Self::new(rows, cols, words)
  }

  pub fn rows(&self) -> u32 {
    self.grid_size.rows
  }

  pub fn cols(&self) -> u32 {
    self.grid_size.cols
  }

  pub fn word(&self, id: WordId) -> Option<&WordPlacement> {
    self.words.iter().find(|word| word.id() == id)
  }
}

/// A puzzle pool label. Any string is accepted; the well-known labels only
/// affect ordering and the default size of bare word lists.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(from = "String", into = "String")]
pub struct Difficulty(String);

impl Difficulty {
  pub fn new(label: impl Into<String>) -> Self {
    Self(label.into().to_ascii_lowercase())
  }

  pub fn easy() -> Self {
    Self::new("easy")
  }

  pub fn medium() -> Self {
    Self::new("medium")
  }

  pub fn hard() -> Self {
    Self::new("hard")
  }

  pub fn label(&self) -> &str {
    &self.0
  }

  fn rank(&self) -> u8 {
    match self.0.as_str() {
      "easy" => 0,
      "medium" => 1,
      "hard" => 2,
      _ => 3,
    }
  }

  fn default_grid_len(&self) -> u32 {
    match self.0.as_str() {
      "easy" => 10,
      "medium" => 13,
      _ => 16,
    }
  }
}

impl Default for Difficulty {
  fn default() -> Self {
    Self::medium()
  }
}

impl PartialOrd for Difficulty {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Difficulty {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .rank()
      .cmp(&other.rank())
      .then_with(|| self.0.cmp(&other.0))
  }
}

impl Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for Difficulty {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for Difficulty {
  fn from(value: String) -> Self {
    Self::new(value)
  }
}

impl From<Difficulty> for String {
  fn from(value: Difficulty) -> Self {
    value.0
  }
}
