use xword_db::{WordId, WordPlacement};

use crate::crossword::{Cell, Crossword};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordCheck {
  pub id: WordId,
  pub correct: bool,
  pub entered: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleCheck {
  pub all_correct: bool,
  pub words: Vec<WordCheck>,
}

impl PuzzleCheck {
  pub fn correct_count(&self) -> usize {
    self.words.iter().filter(|word| word.correct).count()
  }

  pub fn total(&self) -> usize {
    self.words.len()
  }

  pub fn correct_ids(&self) -> impl Iterator<Item = WordId> + '_ {
    self
      .words
      .iter()
      .filter(|word| word.correct)
      .map(|word| word.id)
  }
}

/// Entered letters are uppercased on write and solutions on build, so this is
/// a plain comparison.
pub fn check_word(word: &WordPlacement, xword: &Crossword) -> bool {
  xword.user_word(word) == word.solution
}

pub fn check_puzzle(xword: &Crossword) -> PuzzleCheck {
  let words: Vec<_> = xword
    .words()
    .iter()
    .map(|word| WordCheck {
      id: word.id(),
      correct: check_word(word, xword),
      entered: xword.user_word(word),
    })
    .collect();

  PuzzleCheck {
    all_correct: words.iter().all(|word| word.correct),
    words,
  }
}

pub fn is_fully_filled(xword: &Crossword) -> bool {
  xword
    .grid()
    .iter()
    .filter(|cell| cell.playable())
    .all(Cell::is_filled)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use util::pos::Pos;
  use xword_db::{Direction, WordId};

  use crate::crossword::{tests::cat_cow, Crossword};

  use super::{check_puzzle, check_word, is_fully_filled};

  fn fill(xword: &mut Crossword, letters: &[(i32, i32, char)]) {
    for &(row, col, letter) in letters {
      assert!(xword.set_char(Pos::new(row, col), letter));
    }
  }

  #[gtest]
  fn test_empty_grid_is_not_correct() {
    let xword = Crossword::build(cat_cow()).unwrap();
    let check = check_puzzle(&xword);
    expect_false!(check.all_correct);
    expect_eq!(check.correct_count(), 0);
    expect_eq!(check.total(), 2);
    expect_false!(is_fully_filled(&xword));
  }

  #[gtest]
  fn test_cat_cow_scenario() {
    let mut xword = Crossword::build(cat_cow()).unwrap();
    let cat = xword.words()[0].clone();
    let cow = xword.words()[1].clone();

    fill(&mut xword, &[(1, 2, 'C'), (1, 3, 'A'), (1, 4, 'T')]);
    expect_true!(check_word(&cat, &xword));
    expect_false!(check_word(&cow, &xword));
    expect_false!(check_puzzle(&xword).all_correct);

    fill(&mut xword, &[(2, 2, 'O')]);
    expect_false!(check_puzzle(&xword).all_correct);

    fill(&mut xword, &[(3, 2, 'W')]);
    let check = check_puzzle(&xword);
    expect_true!(check.all_correct);
    expect_true!(is_fully_filled(&xword));
    expect_that!(
      check.correct_ids().collect::<Vec<_>>(),
      container_eq([
        WordId::new(Direction::Across, 1),
        WordId::new(Direction::Down, 1)
      ])
    );

    // The shared C counts for both words.
    xword.clear_char(Pos::new(1, 2));
    let check = check_puzzle(&xword);
    expect_false!(check.all_correct);
    expect_eq!(check.correct_count(), 0);
    expect_eq!(check.words[1].entered, "OW");
  }

  #[gtest]
  fn test_check_word_matches_cells() {
    let mut xword = Crossword::build(cat_cow()).unwrap();
    let cat = xword.words()[0].clone();
    fill(&mut xword, &[(1, 2, 'C'), (1, 3, 'O'), (1, 4, 'T')]);
    expect_false!(check_word(&cat, &xword));

    let cells_match = xword.word_cells(&cat).iter().zip(cat.solution.chars()).all(|(&pos, letter)| {
      xword.cell(pos).and_then(|cell| cell.entered()) == Some(letter)
    });
    expect_false!(cells_match);

    fill(&mut xword, &[(1, 3, 'a')]);
    expect_true!(check_word(&cat, &xword));
  }
}
