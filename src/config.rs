//! Settings resolve in order: defaults, then `~/.xword/config.toml`, then
//! command line flags.

use std::{
  fs,
  path::{Path, PathBuf},
  time::Duration,
};

use log::warn;
use serde::{Deserialize, Serialize};
use util::error::{XWordError, XWordResult};
use xword_db::Difficulty;

use crate::args::Args;

pub const DEFAULT_AUTOSAVE_SECONDS: u64 = 30;

const DATA_DIR: &str = ".xword";

#[derive(Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct XWordConfig {
  #[serde(default)]
  pub game: GameConfig,
  #[serde(default)]
  pub paths: PathsConfig,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
  pub difficulty: Option<String>,
  pub auto_check: Option<bool>,
  pub autosave_seconds: Option<u64>,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathsConfig {
  pub puzzle_db: Option<PathBuf>,
  pub save_file: Option<PathBuf>,
  pub stats_file: Option<PathBuf>,
  pub log_file: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
  pub difficulty: Difficulty,
  pub auto_check: bool,
  pub autosave_interval: Duration,
  pub puzzle_db: Option<PathBuf>,
  pub save_file: PathBuf,
  pub stats_file: PathBuf,
  pub log_file: PathBuf,
}

/// `~/.xword`, or `.xword` under the working directory without a home.
pub fn data_dir() -> PathBuf {
  dirs::home_dir()
    .map(|home| home.join(DATA_DIR))
    .unwrap_or_else(|| PathBuf::from(DATA_DIR))
}

pub fn config_path() -> PathBuf {
  data_dir().join("config.toml")
}

/// Reads the config file. A missing file at the default location is
/// replaced with a commented-out template; a missing explicit file is an
/// error.
pub fn load_config(explicit: Option<&Path>) -> XWordResult<XWordConfig> {
  let path = match explicit {
    Some(path) => path.to_path_buf(),
    None => {
      let path = config_path();
      if !path.exists() {
        write_template(&path);
        return Ok(XWordConfig::default());
      }
      path
    }
  };

  let contents = fs::read_to_string(&path)?;
  parse_config(&contents)
    .map_err(|err| XWordError::Parse(format!("{}: {err}", path.display())).into())
}

pub fn parse_config(contents: &str) -> Result<XWordConfig, toml::de::Error> {
  toml::from_str(contents)
}

fn write_template(path: &Path) {
  let template = format!(
    r#"# xword configuration. Every setting is optional.

# [game]
# difficulty = "medium"
# auto_check = false
# autosave_seconds = {DEFAULT_AUTOSAVE_SECONDS}

# [paths]
# puzzle_db = "/path/to/puzzles.json"
# save_file = "~/.xword/save.json"
# stats_file = "~/.xword/stats.json"
# log_file = "~/.xword/xword.log"
"#
  );

  if let Some(parent) = path.parent() {
    if let Err(err) = fs::create_dir_all(parent) {
      warn!("Failed to create {}: {err}", parent.display());
      return;
    }
  }
  if let Err(err) = fs::write(path, template) {
    warn!("Failed to write config template: {err}");
  }
}

pub fn resolve(config: &XWordConfig, args: &Args) -> Settings {
  resolve_in(config, args, &data_dir())
}

fn resolve_in(config: &XWordConfig, args: &Args, data_dir: &Path) -> Settings {
  let difficulty = args
    .difficulty
    .as_deref()
    .or(config.game.difficulty.as_deref())
    .map(Difficulty::new)
    .unwrap_or_default();

  let auto_check = args.auto_check || config.game.auto_check.unwrap_or(false);

  let autosave_seconds = config
    .game
    .autosave_seconds
    .unwrap_or(DEFAULT_AUTOSAVE_SECONDS)
    .max(1);

  let path_or = |path: &Option<PathBuf>, default: &str| {
    path.clone().unwrap_or_else(|| data_dir.join(default))
  };

  Settings {
    difficulty,
    auto_check,
    autosave_interval: Duration::from_secs(autosave_seconds),
    puzzle_db: args.db.clone().or_else(|| config.paths.puzzle_db.clone()),
    save_file: path_or(&config.paths.save_file, "save.json"),
    stats_file: path_or(&config.paths.stats_file, "stats.json"),
    log_file: path_or(&config.paths.log_file, "xword.log"),
  }
}
