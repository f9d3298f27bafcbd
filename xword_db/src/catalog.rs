use std::{collections::BTreeMap, fs, path::Path};

use bitcode::{Decode, Encode};
use itertools::Itertools;
use log::{debug, info};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use util::error::{XWordError, XWordResult};

use crate::puzzle::{Difficulty, Puzzle, WordPlacement};

const BUILTIN_DB: &str = include_str!("../puzzles.json");

#[derive(Deserialize)]
struct DatabaseFile {
  #[serde(default)]
  version: Option<String>,
  puzzles: BTreeMap<Difficulty, Vec<PuzzleSource>>,
}

/// Database entries come either with an explicit grid size or as a bare word
/// list.
#[derive(Deserialize)]
#[serde(untagged)]
enum PuzzleSource {
  Sized(Puzzle),
  Bare(Vec<WordPlacement>),
}

impl PuzzleSource {
  fn into_puzzle(self, difficulty: &Difficulty) -> Puzzle {
    match self {
      PuzzleSource::Sized(puzzle) => puzzle,
      PuzzleSource::Bare(words) => Puzzle::from_words(words, difficulty),
    }
  }
}

#[derive(Clone, Debug, Default, Encode, Decode)]
pub struct PuzzleCatalog {
  pools: BTreeMap<Difficulty, Vec<Puzzle>>,
}

impl PuzzleCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// The database compiled into the binary.
  pub fn builtin() -> XWordResult<Self> {
    Self::from_json(BUILTIN_DB)
  }

  pub fn from_json(json: &str) -> XWordResult<Self> {
    let file: DatabaseFile = serde_json::from_str(json)
      .map_err(|err| XWordError::Parse(format!("Failed to parse puzzle database: {err}")))?;

    let pools: BTreeMap<_, _> = file
      .puzzles
      .into_iter()
      .map(|(difficulty, sources)| {
        let puzzles = sources
          .into_iter()
          .map(|source| source.into_puzzle(&difficulty))
          .collect_vec();
        (difficulty, puzzles)
      })
      .collect();

    let catalog = Self { pools };
    debug!(
      "Parsed puzzle database version {}: {}",
      file.version.as_deref().unwrap_or("unknown"),
      catalog.summary()
    );
    Ok(catalog)
  }

  /// Loads a catalog from disk. Files ending in `.bin` hold the compiled
  /// form written by `encode`; anything else is read as JSON.
  pub fn load(path: impl AsRef<Path>) -> XWordResult<Self> {
    let path = path.as_ref();
    let catalog = if path.extension().is_some_and(|ext| ext == "bin") {
      Self::decode(&fs::read(path)?)?
    } else {
      Self::from_json(&fs::read_to_string(path)?)?
    };
    info!("Loaded puzzle catalog from {}: {}", path.display(), catalog.summary());
    Ok(catalog)
  }

  pub fn encode(&self) -> Vec<u8> {
    bitcode::encode(self)
  }

  pub fn decode(bytes: &[u8]) -> XWordResult<Self> {
    bitcode::decode(bytes)
      .map_err(|err| XWordError::Parse(format!("Failed to decode compiled catalog: {err}")).into())
  }

  /// Registers a puzzle, returning its index within the difficulty's pool.
  pub fn add_puzzle(&mut self, difficulty: Difficulty, puzzle: Puzzle) -> usize {
    let pool = self.pools.entry(difficulty).or_default();
    pool.push(puzzle);
    pool.len() - 1
  }

  pub fn difficulties(&self) -> impl Iterator<Item = &Difficulty> {
    self.pools.keys()
  }

  pub fn count(&self, difficulty: &Difficulty) -> usize {
    self.pools.get(difficulty).map_or(0, Vec::len)
  }

  pub fn get_by_index(&self, difficulty: &Difficulty, index: usize) -> Option<&Puzzle> {
    self.pools.get(difficulty)?.get(index)
  }

  pub fn get_random(&self, difficulty: &Difficulty) -> Option<(usize, &Puzzle)> {
    self.get_random_with(difficulty, &mut rand::rng())
  }

  pub fn get_random_with<R: Rng + ?Sized>(
    &self,
    difficulty: &Difficulty,
    rng: &mut R,
  ) -> Option<(usize, &Puzzle)> {
    let pool = self.pools.get(difficulty).filter(|pool| !pool.is_empty())?;
    let index = rng.random_range(0..pool.len());
    pool.get(index).map(|puzzle| (index, puzzle))
  }

  /// Every index of the difficulty's pool, shuffled.
  pub fn random_order<R: Rng + ?Sized>(&self, difficulty: &Difficulty, rng: &mut R) -> Vec<usize> {
    let mut order = (0..self.count(difficulty)).collect_vec();
    order.shuffle(rng);
    order
  }

  fn summary(&self) -> String {
    self
      .pools
      .iter()
      .map(|(difficulty, pool)| format!("{difficulty}={}", pool.len()))
      .join(", ")
  }
}
