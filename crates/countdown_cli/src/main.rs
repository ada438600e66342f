//! Terminal countdown probe.
//!
//! # Responsibility
//! - Resolve the persisted target and print the countdown every tick.
//! - Exit on Ctrl-C or once the countdown completes.

use clap::Parser;
use countdown_core::db::open_db;
use countdown_core::{
    default_log_level, init_logging, CountdownConfig, CountdownSession, CountdownState,
    ExpiredTargetPolicy, KeyValueStore, LogDestination, MemoryKeyValueStore, SqliteKeyValueStore,
    StoreResult, SystemClock, TickerError, UnavailableStore,
};
use log::warn;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Counts down to a persisted launch instant", long_about = None)]
struct Args {
    /// SQLite file holding the target. Without it the target lives in memory.
    /// If the file cannot be opened the countdown runs without storage.
    #[arg(long)]
    db: Option<PathBuf>,

    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides `default_offset_days`.
    #[arg(long)]
    offset_days: Option<u32>,

    /// Keep an expired stored target instead of restarting.
    #[arg(long)]
    stay_complete: bool,

    /// Simulate an environment without any storage.
    #[arg(long, conflicts_with = "db")]
    no_storage: bool,

    /// Print one snapshot and exit.
    #[arg(long)]
    once: bool,

    /// Absolute directory for rotating log files. Logs go to stderr otherwise.
    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = setup_logging(&args) {
        eprintln!("countdown: {err}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("countdown: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = open_store(args.db.as_deref(), args.no_storage);
    let result = run(&config, &store, args.once).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("countdown: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Storage backing picked from the command line.
enum CliStore {
    Sqlite(Connection),
    Memory(MemoryKeyValueStore),
    Unavailable,
}

impl KeyValueStore for CliStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Self::Sqlite(conn) => SqliteKeyValueStore::new(conn).get(key),
            Self::Memory(store) => store.get(key),
            Self::Unavailable => UnavailableStore.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        match self {
            Self::Sqlite(conn) => SqliteKeyValueStore::new(conn).set(key, value),
            Self::Memory(store) => store.set(key, value),
            Self::Unavailable => UnavailableStore.set(key, value),
        }
    }
}

/// A `--db` that fails to open means no storage, never a silent memory store.
fn open_store(db: Option<&Path>, no_storage: bool) -> CliStore {
    if no_storage {
        return CliStore::Unavailable;
    }
    let Some(path) = db else {
        return CliStore::Memory(MemoryKeyValueStore::new());
    };
    match open_db(path) {
        Ok(conn) => CliStore::Sqlite(conn),
        Err(err) => {
            warn!(
                "event=store_open module=cli status=error path={} error={err}",
                path.display()
            );
            CliStore::Unavailable
        }
    }
}

async fn run<S: KeyValueStore>(
    config: &CountdownConfig,
    store: S,
    once: bool,
) -> Result<(), TickerError> {
    let session = CountdownSession::start(config, store, SystemClock)?;
    println!("target_ms={}", session.target());
    render(session.state());
    if once || session.state().is_complete() {
        session.shutdown();
        return Ok(());
    }

    let mut updates = session.subscribe();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *updates.borrow_and_update();
                render(state);
                if state.is_complete() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.shutdown();
    Ok(())
}

fn render(state: CountdownState) {
    println!("{}", render_line(state));
}

fn render_line(state: CountdownState) -> String {
    match state {
        CountdownState::Unresolved => "resolving...".to_string(),
        CountdownState::Counting(remaining) => remaining.to_string(),
        CountdownState::Complete => "complete".to_string(),
    }
}

fn setup_logging(args: &Args) -> Result<(), String> {
    let destination = LogDestination::from_dir(args.log_dir.as_deref())?;
    let level = log_level_for(args.log_level.as_deref(), &destination);
    init_logging(level, destination)
}

/// Stderr shares the terminal with the countdown, so per-tick debug lines
/// stay off unless asked for.
fn log_level_for<'a>(requested: Option<&'a str>, destination: &LogDestination) -> &'a str {
    match (requested, destination) {
        (Some(level), _) => level,
        (None, LogDestination::Stderr) => "info",
        (None, LogDestination::Directory(_)) => default_log_level(),
    }
}

fn load_config(args: &Args) -> Result<CountdownConfig, countdown_core::ConfigError> {
    let mut config = match &args.config {
        Some(path) => CountdownConfig::load(path)?,
        None => CountdownConfig::default(),
    };
    if let Some(days) = args.offset_days {
        config.default_offset_days = days;
    }
    if args.stay_complete {
        config.expired_policy = ExpiredTargetPolicy::StayComplete;
    }
    config.validate()?;
    Ok(config)
}
