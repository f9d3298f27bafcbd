#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;
mod board;
mod command;
mod config;
mod run_game;

use std::{
  fs::{self, File},
  io::Write,
  path::{Path, PathBuf},
  process::ExitCode,
};

use args::{Args, RunMode};
use chrono::Utc;
use clap::Parser;
use common::{backup::Backup, crossword::Crossword, stats::Statistics, timer::format_seconds};
use config::Settings;
use log::{info, LevelFilter};
use simplelog::{ConfigBuilder, WriteLogger};
use util::error::{XWordError, XWordResult};
use xword_db::PuzzleCatalog;

fn open_log_file(path: &Path) -> XWordResult<File> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  Ok(File::create(path)?)
}

/// Logs go to a file since stdout carries the board.
fn init_logging(settings: &Settings, verbose: bool) {
  let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
  let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

  let result = open_log_file(&settings.log_file)
    .and_then(|log_file| Ok(WriteLogger::init(level, log_config, log_file)?));
  if let Err(err) = result {
    eprintln!("Not logging to {}: {err}", settings.log_file.display());
  }
}

fn list_puzzles(settings: &Settings) -> XWordResult {
  let catalog = run_game::load_catalog(settings)?;
  let stats = Statistics::load(&settings.stats_file)?;
  for difficulty in catalog.difficulties() {
    println!(
      "{difficulty:<10} {:>3} puzzles, {} solved",
      catalog.count(difficulty),
      stats.completed_count(difficulty)
    );
  }
  Ok(())
}

fn show_puzzle(settings: &Settings, index: usize) -> XWordResult {
  let catalog = run_game::load_catalog(settings)?;
  let puzzle = catalog
    .get_by_index(&settings.difficulty, index)
    .ok_or_else(|| XWordError::NoPuzzleAvailable(format!("{} #{index}", settings.difficulty)))?;
  let xword = Crossword::build(puzzle.clone())?;
  println!("{} #{index}\n\n{}", settings.difficulty, board::render_solution(&xword));
  Ok(())
}

fn compile_db(settings: &Settings, args: &Args) -> XWordResult {
  let catalog = match &settings.puzzle_db {
    Some(path) => PuzzleCatalog::load(path)?,
    None => PuzzleCatalog::builtin()?,
  };
  let encoded = catalog.encode();
  let mut file = File::create(&args.out)?;
  file.write_all(&encoded)?;
  info!("Wrote {} bytes to {}", encoded.len(), args.out.display());
  println!("Wrote {}", args.out.display());
  Ok(())
}

fn show_stats(settings: &Settings) -> XWordResult {
  let stats = Statistics::load(&settings.stats_file)?;
  println!("Games played:    {}", stats.total_games_played);
  println!("Games completed: {}", stats.total_games_completed);
  println!("Words completed: {}", stats.total_words_completed);
  println!("Time played:     {}", format_seconds(stats.total_time_played));
  println!("Current streak:  {}", stats.streaks.current);
  println!("Best streak:     {}", stats.streaks.best);
  for (difficulty, seconds) in &stats.best_times {
    println!("Best {difficulty}: {}", format_seconds(*seconds));
  }
  Ok(())
}

fn reset_stats(settings: &Settings) -> XWordResult {
  let mut stats = Statistics::load(&settings.stats_file)?;
  stats.reset();
  stats.save(&settings.stats_file)?;
  println!("Statistics reset.");
  Ok(())
}

fn export_data(settings: &Settings, args: &Args) -> XWordResult {
  let now = Utc::now();
  let path = args
    .file
    .clone()
    .unwrap_or_else(|| PathBuf::from(format!("xword_backup_{}.json", now.format("%Y-%m-%d"))));
  Backup::collect(&settings.stats_file, &settings.save_file, now)?.write(&path)?;
  println!("Exported to {}", path.display());
  Ok(())
}

fn import_data(settings: &Settings, args: &Args) -> XWordResult {
  let path = args
    .file
    .as_deref()
    .ok_or_else(|| XWordError::Parse("import needs --file <backup.json>".to_owned()))?;
  Backup::read(path)?.restore(&settings.stats_file, &settings.save_file)?;
  println!("Imported {}", path.display());
  Ok(())
}

async fn run() -> XWordResult {
  let args = Args::parse();
  let config = config::load_config(args.config.as_deref())?;
  let settings = config::resolve(&config, &args);
  init_logging(&settings, args.verbose);
  info!("Starting in {:?} mode", args.mode);

  match args.mode {
    RunMode::Play => run_game::play(&settings, &args).await,
    RunMode::List => list_puzzles(&settings),
    RunMode::Show => show_puzzle(&settings, args.index.unwrap_or(0)),
    RunMode::CompileDb => compile_db(&settings, &args),
    RunMode::Stats => show_stats(&settings),
    RunMode::ResetStats => reset_stats(&settings),
    RunMode::Export => export_data(&settings, &args),
    RunMode::Import => import_data(&settings, &args),
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  if let Err(err) = run().await {
    eprintln!("Error: {err}");
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use std::{env, fs, process};

  use googletest::prelude::*;

  use super::open_log_file;

  #[gtest]
  fn test_open_log_file() {
    let dir = env::temp_dir().join(format!("xword-log-{}", process::id()));
    let path = dir.join("nested").join("xword.log");
    expect_that!(open_log_file(&path), ok(anything()));
    expect_true!(path.exists());

    // A regular file where the directory should be.
    let blocked = dir.join("nested").join("xword.log").join("inner.log");
    expect_that!(open_log_file(&blocked), err(anything()));
    fs::remove_dir_all(&dir).unwrap();
  }
}
