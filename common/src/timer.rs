/// Play-time counter. It does not keep time itself; the owner feeds it one
/// `tick` per elapsed second.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
  seconds: u64,
  running: bool,
}

impl Timer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_seconds(seconds: u64) -> Self {
    Self { seconds, running: false }
  }

  pub fn start(&mut self) {
    self.running = true;
  }

  pub fn pause(&mut self) {
    self.running = false;
  }

  /// Zeroes the counter and stops it.
  pub fn reset(&mut self) {
    self.seconds = 0;
    self.running = false;
  }

  pub fn tick(&mut self) -> bool {
    if self.running {
      self.seconds += 1;
    }
    self.running
  }

  pub fn seconds(&self) -> u64 {
    self.seconds
  }

  pub fn is_running(&self) -> bool {
    self.running
  }
}

/// `mm:ss`, or `h:mm:ss` past the hour.
pub fn format_seconds(seconds: u64) -> String {
  let (hours, minutes, seconds) = (seconds / 3600, (seconds / 60) % 60, seconds % 60);
  if hours > 0 {
    format!("{hours}:{minutes:02}:{seconds:02}")
  } else {
    format!("{minutes:02}:{seconds:02}")
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use super::{format_seconds, Timer};

  #[gtest]
  fn test_ticks_only_while_running() {
    let mut timer = Timer::new();
    expect_false!(timer.tick());
    expect_eq!(timer.seconds(), 0);

    timer.start();
    timer.tick();
    timer.tick();
    expect_eq!(timer.seconds(), 2);

    timer.pause();
    timer.tick();
    expect_eq!(timer.seconds(), 2);
    expect_false!(timer.is_running());
  }

  #[gtest]
  fn test_reset() {
    let mut timer = Timer::with_seconds(40);
    timer.start();
    timer.reset();
    expect_eq!(timer.seconds(), 0);
    expect_false!(timer.is_running());
  }

  #[gtest]
  fn test_format() {
    expect_eq!(format_seconds(0), "00:00");
    expect_eq!(format_seconds(75), "01:15");
    expect_eq!(format_seconds(3725), "1:02:05");
  }
}
