use std::{path::Path, time::Duration};

use chrono::{DateTime, Utc};
use common::{
  game::{GameEvent, GameOptions},
  session::Session,
  snapshot::SavedGame,
  stats::Statistics,
  timer::format_seconds,
};
use itertools::Itertools;
use log::{debug, error, info, warn};
use tokio::{
  io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
  sync::mpsc,
  task::JoinHandle,
  time::{interval, MissedTickBehavior},
};
use util::error::XWordResult;
use xword_db::PuzzleCatalog;

use crate::{
  args::Args,
  board::render_game,
  command::{parse_command, Command, HELP},
  config::Settings,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub fn load_catalog(settings: &Settings) -> XWordResult<PuzzleCatalog> {
  match &settings.puzzle_db {
    Some(path) => PuzzleCatalog::load(path),
    None => PuzzleCatalog::builtin(),
  }
}

/// Sends the session generation it was started for once a second until
/// aborted.
fn spawn_ticker(generation: u64, tx: mpsc::UnboundedSender<u64>) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut ticks = interval(TICK_PERIOD);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticks.tick().await;
    loop {
      ticks.tick().await;
      if tx.send(generation).is_err() {
        return;
      }
    }
  })
}

struct Ticker {
  tx: mpsc::UnboundedSender<u64>,
  handle: Option<JoinHandle<()>>,
}

impl Ticker {
  fn new(tx: mpsc::UnboundedSender<u64>) -> Self {
    Self { tx, handle: None }
  }

  /// Aborts the running ticker before starting one for `generation`.
  fn restart(&mut self, generation: u64) {
    self.stop();
    self.handle = Some(spawn_ticker(generation, self.tx.clone()));
  }

  fn stop(&mut self) {
    if let Some(handle) = self.handle.take() {
      handle.abort();
    }
  }
}

fn save_game(session: &Session, settings: &Settings) {
  let result = match session.game() {
    Some(game) if !game.is_complete() => {
      SavedGame::new(game.snapshot(), Utc::now()).save(&settings.save_file)
    }
    _ => SavedGame::remove(&settings.save_file),
  };
  if let Err(err) = result {
    error!("Failed to save game to {}: {err}", settings.save_file.display());
  }
}

fn save_stats(session: &mut Session, settings: &Settings) {
  if !session.take_stats_changed() {
    return;
  }
  if let Err(err) = session.stats().save(&settings.stats_file) {
    error!("Failed to save statistics to {}: {err}", settings.stats_file.display());
  }
}

/// Restores the game saved at `path`. A save that can't be restored is
/// deleted.
fn resume_from(session: &mut Session, path: &Path, now: DateTime<Utc>) -> bool {
  let resumed = SavedGame::load(path, now).and_then(|saved| match saved {
    Some(saved) => session.restore(&saved.game).map(|_| true),
    None => Ok(false),
  });
  match resumed {
    Ok(resumed) => resumed,
    Err(err) => {
      warn!("Discarding saved game: {err}");
      if let Err(err) = SavedGame::remove(path) {
        warn!("Failed to remove {}: {err}", path.display());
      }
      false
    }
  }
}

fn start_first_game(session: &mut Session, settings: &Settings, args: &Args) -> XWordResult {
  if !args.new && args.index.is_none() && resume_from(session, &settings.save_file, Utc::now()) {
    println!("Resumed your saved game. Start over with `:new`.");
    return Ok(());
  }
  match args.index {
    Some(index) => session.start_puzzle(&settings.difficulty, index)?,
    None => session.new_game(&settings.difficulty)?,
  };
  Ok(())
}

fn report_events(events: Vec<GameEvent>) {
  for event in events {
    match event {
      GameEvent::SelectionChanged | GameEvent::CellInput { .. } => debug!("{event:?}"),
      GameEvent::WordCompleted(id) => info!("Word {id} completed"),
      GameEvent::PuzzleCompleted { seconds, words } => {
        info!("Puzzle completed in {seconds}s");
        println!(
          "Solved all {words} words in {}! `:new` for another puzzle.",
          format_seconds(seconds)
        );
      }
    }
  }
}

enum Flow {
  Continue,
  /// The clock restarted, either for a new game or a reset.
  Restarted,
  Quit,
}

fn apply(session: &mut Session, command: Command, settings: &Settings) -> XWordResult<Flow> {
  match command {
    Command::Keys(keys) => {
      session.with_game(|game| {
        for key in keys {
          game.keypress(key);
        }
      });
    }
    Command::Click(pos) => {
      if session.with_game(|game| game.pointer_select(pos)) == Some(false) {
        println!("{pos} is not a playable cell.");
      }
    }
    Command::Word(id) => {
      if session.with_game(|game| game.select_word(id)) == Some(false) {
        println!("There is no word {id}.");
      }
    }
    Command::Check => {
      if let Some(check) = session.with_game(|game| game.check()) {
        let wrong = check
          .words
          .iter()
          .filter(|word| !word.correct)
          .map(|word| word.id)
          .join(", ");
        println!("{}/{} words correct.", check.correct_count(), check.total());
        if !wrong.is_empty() {
          println!("Not yet: {wrong}");
        }
      }
    }
    Command::Reveal => {
      session.with_game(|game| game.reveal_letter());
    }
    Command::Reset => {
      session.with_game(|game| game.reset());
      return Ok(Flow::Restarted);
    }
    Command::New(difficulty) => {
      let difficulty = difficulty.unwrap_or_else(|| settings.difficulty.clone());
      session.new_game(&difficulty)?;
      return Ok(Flow::Restarted);
    }
    Command::Save => {
      save_game(session, settings);
      println!("Saved.");
    }
    Command::Help => println!("{HELP}"),
    Command::Quit => return Ok(Flow::Quit),
    Command::Redraw => {}
  }
  Ok(Flow::Continue)
}

fn redraw(session: &mut Session) {
  if let Some(events) = session.with_game(|game| game.take_events()) {
    report_events(events);
  }
  if let Some(game) = session.game() {
    println!("\n{}", render_game(game));
  }
}

/// Runs the interactive game until `:quit` or end of input.
pub async fn play(settings: &Settings, args: &Args) -> XWordResult {
  let catalog = load_catalog(settings)?;
  let stats = Statistics::load(&settings.stats_file)?;
  let options = GameOptions { auto_check: settings.auto_check };
  let mut session = Session::new(catalog, stats, options);
  start_first_game(&mut session, settings, args)?;

  println!("{HELP}");
  run_loop(&mut session, settings, BufReader::new(tokio::io::stdin()).lines()).await;
  info!("Exiting play");
  Ok(())
}

/// Feeds input lines to the session until `:quit`, end of input or a read
/// error, then saves.
async fn run_loop<R>(session: &mut Session, settings: &Settings, mut lines: Lines<R>)
where
  R: AsyncBufRead + Unpin,
{
  let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
  let mut ticker = Ticker::new(tick_tx);
  ticker.restart(session.generation());

  let mut autosave = interval(settings.autosave_interval);
  autosave.set_missed_tick_behavior(MissedTickBehavior::Delay);
  autosave.tick().await;

  redraw(session);

  loop {
    tokio::select! {
      line = lines.next_line() => {
        let line = match line {
          Ok(Some(line)) => line,
          Ok(None) => {
            debug!("End of input");
            break;
          }
          Err(err) => {
            error!("Failed to read input: {err}");
            println!("Can't read input ({err}), saving and exiting.");
            break;
          }
        };
        let flow = parse_command(&line).and_then(|command| apply(session, command, settings));
        match flow {
          Ok(Flow::Quit) => break,
          Ok(Flow::Restarted) => ticker.restart(session.generation()),
          Ok(Flow::Continue) => {}
          Err(err) => println!("{err}"),
        }
        redraw(session);
        save_stats(session, settings);
      }
      Some(generation) = tick_rx.recv() => {
        session.tick(generation);
      }
      _ = autosave.tick() => {
        save_game(session, settings);
      }
    }
  }

  ticker.stop();
  save_game(session, settings);
  save_stats(session, settings);
}
