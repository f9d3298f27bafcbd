use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
  /// Play in the terminal, resuming a saved game if there is one.
  Play,
  /// List difficulties and how many puzzles each has.
  List,
  /// Print one puzzle's solution and clues.
  Show,
  /// Compile a JSON puzzle database into the binary catalog format.
  CompileDb,
  /// Print play statistics.
  Stats,
  /// Clear totals, best times and streaks.
  ResetStats,
  /// Write statistics and the saved game to one JSON file.
  Export,
  /// Replace statistics and the saved game with the contents of a backup.
  Import,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  #[arg(long, default_value = "play")]
  pub mode: RunMode,

  /// Overrides the configured difficulty.
  #[arg(short, long)]
  pub difficulty: Option<String>,

  /// Puzzle index within the difficulty, instead of a random one.
  #[arg(short, long)]
  pub index: Option<usize>,

  /// Puzzle database, either JSON or compiled `.bin`.
  #[arg(long)]
  pub db: Option<PathBuf>,

  /// Output path for `compile-db`.
  #[arg(long, default_value = "puzzles.bin")]
  pub out: PathBuf,

  /// Backup file for `export` and `import`.
  #[arg(short, long)]
  pub file: Option<PathBuf>,

  /// Config file, defaulting to `~/.xword/config.toml`.
  #[arg(long)]
  pub config: Option<PathBuf>,

  /// Start a new game even if a saved one exists.
  #[arg(long)]
  pub new: bool,

  /// Finish the puzzle as soon as the grid is filled in correctly, without
  /// waiting for `:check`.
  #[arg(long)]
  pub auto_check: bool,

  #[arg(short, long)]
  pub verbose: bool,
}
