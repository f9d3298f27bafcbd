use common::{crossword::Crossword, game::Game, timer::format_seconds};
use itertools::Itertools;
use util::{grid::Gridlike, pos::Pos};
use xword_db::{Direction, WordPlacement};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Highlight {
  None,
  ActiveWord,
  Selected,
}

fn render_grid<F>(xword: &Crossword, cell_text: F) -> String
where
  F: Fn(Pos) -> (char, Highlight),
{
  let header = (0..xword.cols()).map(|col| format!(" {} ", col % 10)).join("");
  let rows = (0..xword.rows() as i32).map(|row| {
    let cells = (0..xword.cols() as i32)
      .map(|col| {
        let (letter, highlight) = cell_text(Pos::new(row, col));
        match highlight {
          Highlight::None => format!(" {letter} "),
          Highlight::ActiveWord => format!("({letter})"),
          Highlight::Selected => format!("[{letter}]"),
        }
      })
      .join("");
    format!("{row:>2} {cells}")
  });
  std::iter::once(format!("   {header}")).chain(rows).join("\n")
}

fn clue_line(word: &WordPlacement, marker: &str, status: &str) -> String {
  format!(
    "{marker}{:>3}. {} ({}) {status}",
    word.number,
    word.clue,
    word.len()
  )
  .trim_end()
  .to_owned()
}

fn clue_section<'a>(
  words: impl Iterator<Item = &'a WordPlacement>,
  direction: Direction,
  line: impl Fn(&WordPlacement) -> String,
) -> String {
  let lines = words
    .filter(|word| word.direction == direction)
    .map(line)
    .join("\n");
  format!("{direction}:\n{lines}")
}

/// The board as the player sees it: grid with selection, clue lists and
/// status line.
pub fn render_game(game: &Game) -> String {
  let xword = game.crossword();
  let cursor = game.cursor();
  let active = cursor.active_word(xword);
  let completed = game.completed_words();

  let grid = render_grid(xword, |pos| {
    let letter = match xword.grid().get(pos) {
      Some(cell) if cell.playable() => cell.entered().unwrap_or('.'),
      _ => '#',
    };
    let highlight = if cursor.pos() == Some(pos) {
      Highlight::Selected
    } else if active.is_some_and(|word| word.contains(pos)) {
      Highlight::ActiveWord
    } else {
      Highlight::None
    };
    (letter, highlight)
  });

  let line = |word: &WordPlacement| {
    let marker = if active.is_some_and(|active| active.id() == word.id()) { ">" } else { " " };
    let status = if completed.contains(&word.id()) { "ok" } else { "" };
    clue_line(word, marker, status)
  };

  let (done, total) = game.progress();
  let status = format!(
    "{} #{}  {}  {done}/{total} words{}",
    game.difficulty(),
    game.puzzle_index(),
    format_seconds(game.timer().seconds()),
    if game.is_complete() { "  solved!" } else { "" }
  );

  [
    status,
    grid,
    clue_section(xword.words().iter(), Direction::Across, line),
    clue_section(xword.words().iter(), Direction::Down, line),
  ]
  .join("\n\n")
}

/// The filled-in solution with every clue.
pub fn render_solution(xword: &Crossword) -> String {
  let grid = render_grid(xword, |pos| {
    let letter = xword.cell(pos).and_then(|cell| cell.solution()).unwrap_or('#');
    (letter, Highlight::None)
  });
  let line = |word: &WordPlacement| {
    format!("{} {}", clue_line(word, " ", ""), word.solution)
  };

  [
    grid,
    clue_section(xword.words().iter(), Direction::Across, line),
    clue_section(xword.words().iter(), Direction::Down, line),
  ]
  .join("\n\n")
}
