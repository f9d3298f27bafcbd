use std::fmt::{Debug, Display};

use crate::pos::Pos;

pub trait Gridlike<T> {
  fn rows(&self) -> u32;
  fn cols(&self) -> u32;

  fn in_bounds(&self, pos: Pos) -> bool {
    pos.row >= 0 && pos.row < self.rows() as i32 && pos.col >= 0 && pos.col < self.cols() as i32
  }

  fn get(&self, pos: Pos) -> Option<&T>;

  fn iter_row<'a, 'b>(&'a self, row: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a,
  {
    let row = row as i32;
    (0..self.cols()).flat_map(move |col| self.get(Pos { row, col: col as i32 }))
  }
}

pub trait MutGridlike<T>: Gridlike<T> {
  fn get_mut(&mut self, pos: Pos) -> Option<&mut T>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Grid<T> {
  grid: Vec<T>,
  rows: u32,
  cols: u32,
}

impl<T> Grid<T> {
  fn idx(&self, pos: Pos) -> usize {
    debug_assert!(self.in_bounds(pos));
    pos.col as usize + pos.row as usize * self.cols as usize
  }

  /// All positions in reading order.
  pub fn positions(&self) -> impl Iterator<Item = Pos> {
    let cols = self.cols;
    (0..self.rows as i32).flat_map(move |row| (0..cols as i32).map(move |col| Pos { row, col }))
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.grid.iter()
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
    self.grid.iter_mut()
  }
}

impl<T> Grid<T>
where
  T: Default,
{
  pub fn new(rows: u32, cols: u32) -> Self {
    Self {
      grid: (0..rows as usize * cols as usize).map(|_| T::default()).collect(),
      rows,
      cols,
    }
  }
}

impl<T> Gridlike<T> for Grid<T> {
  fn rows(&self) -> u32 {
    self.rows
  }

  fn cols(&self) -> u32 {
    self.cols
  }

  fn get(&self, pos: Pos) -> Option<&T> {
    self
      .in_bounds(pos)
      .then(|| self.grid.get(self.idx(pos)))
      .flatten()
  }
}

impl<T> MutGridlike<T> for Grid<T> {
  fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
    self
      .in_bounds(pos)
      .then(|| {
        let index = self.idx(pos);
        self.grid.get_mut(index)
      })
      .flatten()
  }
}

impl<T: Debug> Debug for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    (0..self.rows).try_fold((), |_, row| {
      self.iter_row(row).try_fold((), |_, t| write!(f, "{t:?} "))?;
      writeln!(f)
    })
  }
}

impl<T: Display> Display for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    (0..self.rows).try_fold((), |_, row| {
      self.iter_row(row).try_fold((), |_, t| write!(f, "{t} "))?;
      writeln!(f)
    })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use crate::pos::Pos;

  use super::{Grid, Gridlike, MutGridlike};

  fn numbered(rows: u32, cols: u32) -> Grid<u32> {
    let mut grid = Grid::new(rows, cols);
    for (n, cell) in grid.iter_mut().enumerate() {
      *cell = n as u32 + 1;
    }
    grid
  }

  #[gtest]
  fn test_bounds() {
    let grid: Grid<u8> = Grid::new(2, 3);
    expect_eq!(grid.iter().count(), 6);
    expect_true!(grid.in_bounds(Pos::new(1, 2)));
    expect_false!(grid.in_bounds(Pos::new(2, 0)));
    expect_false!(grid.in_bounds(Pos::new(0, 3)));
    expect_false!(grid.in_bounds(Pos::new(-1, 0)));
    expect_that!(grid.get(Pos::new(0, -1)), none());
  }

  #[gtest]
  fn test_row_major_layout() {
    let mut grid = numbered(2, 3);
    expect_that!(grid.get(Pos::new(1, 0)), some(eq(&4)));
    *grid.get_mut(Pos::new(0, 2)).unwrap() = 9;
    expect_that!(grid.iter_row(0).copied().collect::<Vec<_>>(), container_eq([1, 2, 9]));
    expect_that!(
      grid.positions().collect::<Vec<_>>(),
      container_eq([
        Pos::new(0, 0),
        Pos::new(0, 1),
        Pos::new(0, 2),
        Pos::new(1, 0),
        Pos::new(1, 1),
        Pos::new(1, 2),
      ])
    );
  }

  #[gtest]
  fn test_display() {
    expect_eq!(numbered(2, 2).to_string(), "1 2 \n3 4 \n");
  }
}
