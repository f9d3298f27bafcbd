use util::pos::Diff;

/// Keyboard input understood by a `Game`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
  Char(char),
  Backspace,
  Delete,
  Left,
  Right,
  Up,
  Down,
  Tab,
  BackTab,
  Space,
}

impl Key {
  pub fn arrow_diff(self) -> Option<Diff> {
    match self {
      Key::Left => Some(Diff::LEFT),
      Key::Right => Some(Diff::RIGHT),
      Key::Up => Some(Diff::UP),
      Key::Down => Some(Diff::DOWN),
      _ => None,
    }
  }
}
