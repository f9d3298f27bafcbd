use common::input::Key;
use util::{
  error::{XWordError, XWordResult},
  pos::Pos,
};
use xword_db::{Difficulty, WordId};

pub const HELP: &str = "\
Type letters to fill the grid; `<` is backspace.
  :left :right :up :down    move, skipping black cells
  :tab :backtab             next / previous word
  :space                    toggle direction
  :del                      clear the selected cell
  :click <row> <col>        select a cell (again to toggle direction)
  :word <H1|V3|...>         jump to a clue
  :check :reveal :reset     check the grid, reveal a letter, start over
  :new [difficulty]         start a new puzzle
  :save :help :quit";

/// One line of player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
  Keys(Vec<Key>),
  Click(Pos),
  Word(WordId),
  Check,
  Reveal,
  Reset,
  New(Option<Difficulty>),
  Save,
  Help,
  Quit,
  Redraw,
}

fn parse_error(msg: impl Into<String>) -> Box<dyn std::error::Error> {
  XWordError::Parse(msg.into()).into()
}

fn parse_keys(line: &str) -> XWordResult<Command> {
  line
    .chars()
    .filter(|c| !c.is_whitespace())
    .map(|c| match c {
      '<' => Ok(Key::Backspace),
      c if c.is_ascii_alphabetic() => Ok(Key::Char(c)),
      c => Err(parse_error(format!("Can't type '{c}'"))),
    })
    .collect::<XWordResult<Vec<_>>>()
    .map(Command::Keys)
}

pub fn parse_command(line: &str) -> XWordResult<Command> {
  let line = line.trim();
  let Some(rest) = line.strip_prefix(':') else {
    return if line.is_empty() { Ok(Command::Redraw) } else { parse_keys(line) };
  };

  let mut words = rest.split_whitespace();
  let name = words.next().unwrap_or_default().to_ascii_lowercase();
  let args: Vec<_> = words.collect();

  let key = |key: Key| -> XWordResult<Command> { Ok(Command::Keys(vec![key])) };
  match (name.as_str(), args.as_slice()) {
    ("left", []) => key(Key::Left),
    ("right", []) => key(Key::Right),
    ("up", []) => key(Key::Up),
    ("down", []) => key(Key::Down),
    ("tab", []) => key(Key::Tab),
    ("backtab", []) => key(Key::BackTab),
    ("space", []) => key(Key::Space),
    ("del" | "delete", []) => key(Key::Delete),
    ("bs" | "backspace", []) => key(Key::Backspace),
    ("click", [row, col]) => {
      let coord = |s: &str| {
        s.parse::<i32>()
          .map_err(|_| parse_error(format!("Bad coordinate \"{s}\"")))
      };
      Ok(Command::Click(Pos::new(coord(*row)?, coord(*col)?)))
    }
    ("word", [id]) => Ok(Command::Word(id.to_ascii_uppercase().parse()?)),
    ("check", []) => Ok(Command::Check),
    ("reveal", []) => Ok(Command::Reveal),
    ("reset", []) => Ok(Command::Reset),
    ("new", []) => Ok(Command::New(None)),
    ("new", [difficulty]) => Ok(Command::New(Some(Difficulty::new(*difficulty)))),
    ("save", []) => Ok(Command::Save),
    ("help" | "h" | "?", []) => Ok(Command::Help),
    ("quit" | "q", []) => Ok(Command::Quit),
    _ => Err(parse_error(format!("Unknown command \":{rest}\", try :help"))),
  }
}
