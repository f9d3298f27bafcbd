use std::{
  fmt::Display,
  ops::{Add, Mul, Sub},
};

/// A cell coordinate. Rows grow downward, columns grow to the right.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
  pub row: i32,
  pub col: i32,
}

impl Pos {
  pub const fn new(row: i32, col: i32) -> Self {
    Self { row, col }
  }
}

impl Sub for Pos {
  type Output = Diff;

  fn sub(self, rhs: Self) -> Diff {
    Diff { row: self.row - rhs.row, col: self.col - rhs.col }
  }
}

impl Add<Diff> for Pos {
  type Output = Self;

  fn add(self, rhs: Diff) -> Self {
    Self { row: self.row + rhs.row, col: self.col + rhs.col }
  }
}

impl Display for Pos {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.row, self.col)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diff {
  pub row: i32,
  pub col: i32,
}

impl Diff {
  pub const RIGHT: Self = Self { row: 0, col: 1 };
  pub const LEFT: Self = Self { row: 0, col: -1 };
  pub const DOWN: Self = Self { row: 1, col: 0 };
  pub const UP: Self = Self { row: -1, col: 0 };

  pub const fn is_zero(&self) -> bool {
    self.row == 0 && self.col == 0
  }
}

impl Mul<Diff> for i32 {
  type Output = Diff;

  fn mul(self, rhs: Diff) -> Diff {
    Diff { row: self * rhs.row, col: self * rhs.col }
  }
}
