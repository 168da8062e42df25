use crate::commands::pool::load_pool;
use clap::{Args, ValueEnum};
use dialoguer::{Confirm, Select};
use gazette_core::{
    Clock, DayBoundary, DayKey, FixedClock, GameConfig, GamePhase, GameSession, GazetteError,
    Result, Round, SqliteStore, SystemClock, Variant,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct PlayArgs {
    /// Content pool JSON file
    pub pool: PathBuf,

    /// Which game to play
    #[arg(short, long, value_enum, default_value_t = Game::Headlines)]
    pub game: Game,

    /// Play a specific date instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Roll the day over on the local calendar instead of UTC
    #[arg(long)]
    pub local: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Game {
    /// Spot the real headline among decoys
    Headlines,
    /// Pick the higher-ranked of two same-category entries
    Pairs,
    /// Daily news quiz
    Quiz,
}

impl Game {
    pub fn config(self) -> GameConfig {
        match self {
            Game::Headlines => GameConfig::headline_game(),
            Game::Pairs => GameConfig::stat_showdown(),
            Game::Quiz => GameConfig::news_quiz(Variant::Shuffled),
        }
    }
}

pub fn handle_play_command(args: PlayArgs, data_dir: &Path) -> Result<()> {
    let pool = load_pool(&args.pool)?;
    tracing::debug!(items = pool.len(), "content pool loaded");

    let mut config = args.game.config();
    if args.local {
        config = config.with_boundary(DayBoundary::Local);
    }

    let clock: Arc<dyn Clock> = match &args.date {
        Some(date) => Arc::new(FixedClock::new(DayKey::from_key(date)?.date())),
        None => Arc::new(SystemClock),
    };
    let store = Arc::new(SqliteStore::new(&data_dir.join("progress.db"))?);

    let mut session = GameSession::new(config, store, clock, &pool)?;

    if session.rounds().is_empty() {
        println!(
            "Not enough content in '{}' to build a daily set.",
            args.pool.display()
        );
        return Ok(());
    }

    let total = session.rounds().len();
    let left = session.rounds_left().min(total as u32);
    println!("Gazette daily - {}", session.day_key());
    println!("{} rounds today, {} left to play", total, left);
    println!();

    loop {
        while let GamePhase::Playing { round } = session.phase() {
            let current = session
                .current_round()
                .cloned()
                .ok_or_else(|| GazetteError::internal("active round missing from set"))?;
            let won = play_round(round, &current)?;

            if won {
                session.round_won()?;
                println!("Correct!");
            } else {
                session.round_lost()?;
                print_answer(&current);
            }
            println!();
            session.advance_round()?;
        }

        if session.rounds_left() == 0 && !session.is_replay() {
            println!("That's all for today - come back tomorrow.");
        }

        let replay = Confirm::new()
            .with_prompt("Replay today's rounds? (does not count against tomorrow)")
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if !replay {
            return Ok(());
        }
        session.start_replay()?;
        println!();
    }
}

fn play_round(number: usize, round: &Round) -> Result<bool> {
    match round {
        Round::Choice {
            correct, options, ..
        } => {
            let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            let choice = Select::new()
                .with_prompt(format!("Round {number}: which one is real?"))
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            Ok(options[choice].id == correct.id)
        }
        Round::Pair {
            category,
            left,
            right,
            ..
        } => {
            let labels = [left.label.as_str(), right.label.as_str()];
            let choice = Select::new()
                .with_prompt(format!("Round {number}: who ranks higher at {category}?"))
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let (picked, other) = if choice == 0 {
                (left, right)
            } else {
                (right, left)
            };
            Ok(picked.value.unwrap_or(0.0) >= other.value.unwrap_or(0.0))
        }
        Round::Question { item, .. } => {
            println!("Round {number}: {}", item.label);
            Confirm::new()
                .with_prompt("Did you get it?")
                .default(false)
                .interact()
                .map_err(prompt_err)
        }
    }
}

fn print_answer(round: &Round) {
    match round {
        Round::Choice { correct, .. } => println!("Not quite - it was: {}", correct.label),
        Round::Pair { left, right, .. } => {
            let winner = if left.value.unwrap_or(0.0) >= right.value.unwrap_or(0.0) {
                left
            } else {
                right
            };
            println!("Not quite - {} ranks higher", winner.label);
        }
        Round::Question { .. } => println!("Better luck on the next one"),
    }
}

fn prompt_err(err: dialoguer::Error) -> GazetteError {
    GazetteError::internal(format!("prompt failed: {err}"))
}
