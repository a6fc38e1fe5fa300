//! # PinHash Cracker
//!
//! Terminal front-end for the PinHash digest guessing game.
//!
//! ## How the puzzle works
//! ```text
//! secret  = random integer in [100, 999]       (never stored)
//! digest  = hex(SHA-256(decimal(secret)))      (stored until reset)
//! ```
//! A 3-digit secret has only 900 candidates, so `solve` and `crack` recover
//! it by trying every one.
//!
//! ## Usage
//! ```bash
//! # Show the current puzzle
//! pin-cracker show
//!
//! # Guess, or play interactively
//! pin-cracker guess 137
//! pin-cracker play
//!
//! # Crack any digest over a custom range on all cores
//! pin-cracker crack --digest <HEX> --min 0 --max 9999 --threads 0
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pinhash_common::constants::{DEFAULT_STORE_PATH, SECRET_MAX, SECRET_MIN};
use pinhash_common::{
    Digest, FileStore, GuessOutcome, PinHashError, Puzzle, SearchDomain, SearchHandle,
    SearchOutcome, StatusView, sanitize_input,
};

mod crack;
mod play;
mod progress;

use progress::{format_number, rate};

/// PinHash Cracker - guess or brute-force a hashed 3-digit number
#[derive(Parser, Debug)]
#[command(name = "pin-cracker")]
#[command(author, version, about = "Guess or brute-force a hashed 3-digit number", long_about = None)]
struct Args {
    /// Where the puzzle digest is kept between runs
    #[arg(long, global = true, env = "PINHASH_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current puzzle digest, generating one if needed
    Show,

    /// Check a single guess
    Guess {
        /// Three digits; other characters are stripped
        pin: String,
    },

    /// Interactive session
    Play,

    /// Brute-force the current puzzle
    Solve,

    /// Brute-force an arbitrary digest
    Crack {
        /// Hex SHA-256 digest to invert
        #[arg(short, long)]
        digest: String,

        /// Lowest candidate (inclusive)
        #[arg(long, default_value_t = SECRET_MIN)]
        min: u32,

        /// Highest candidate (inclusive)
        #[arg(long, default_value_t = SECRET_MAX)]
        max: u32,

        /// Number of threads (0 = auto-detect, 1 = sequential)
        #[arg(short, long, default_value = "1")]
        threads: usize,
    },

    /// Forget the current puzzle
    Reset,
}

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Success = 0,
    Failure = 1,
    Invalid = 2,
    Fault = 3,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_for_error(&e).into()
        }
    }
}

fn exit_for_error(err: &anyhow::Error) -> Exit {
    match err.downcast_ref::<PinHashError>() {
        Some(PinHashError::InvalidGuessFormat(_))
        | Some(PinHashError::InvalidDigest(_))
        | Some(PinHashError::InvalidDomain(_))
        | Some(PinHashError::NotFound { .. }) => Exit::Invalid,
        _ => Exit::Fault,
    }
}

async fn run(args: Args) -> Result<Exit> {
    let store = Arc::new(FileStore::new(&args.store));
    let puzzle = Puzzle::sha256(store);

    match args.command {
        Command::Show => {
            show(&puzzle).await?;
            Ok(Exit::Success)
        }
        Command::Guess { pin } => guess(&puzzle, &pin).await,
        Command::Play => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let summary = play::run_session(&puzzle, stdin.lock(), &mut stdout).await?;
            println!();
            println!("📊 Guesses: {}", summary.guesses);
            Ok(if summary.solved { Exit::Success } else { Exit::Failure })
        }
        Command::Solve => solve(&puzzle).await,
        Command::Crack {
            digest,
            min,
            max,
            threads,
        } => {
            let target: Digest = digest.parse()?;
            let domain = SearchDomain::new(min, max)?;
            crack_digest(target, domain, threads).await
        }
        Command::Reset => {
            match puzzle.secrets.reset().await {
                Ok(()) => println!("🧹 Puzzle cleared ({})", args.store.display()),
                Err(e) => println!("⚠️  {}", e),
            }
            Ok(Exit::Success)
        }
    }
}

async fn show(puzzle: &Puzzle) -> Result<()> {
    let obtained = puzzle.secrets.obtain_or_degrade().await?;
    println!("🔐 {}: {}", puzzle.secrets.algorithm(), obtained.digest);
    if !obtained.persistent {
        println!("⚠️  Store unavailable; this puzzle only lasts for this run");
    }
    Ok(())
}

async fn guess(puzzle: &Puzzle, raw: &str) -> Result<Exit> {
    let pin = sanitize_input(raw);
    let digest = puzzle.secrets.obtain_or_degrade().await?.digest;
    let outcome = puzzle.evaluator.evaluate(&pin, &digest)?;

    println!("{}", StatusView::for_guess(outcome).message);
    Ok(match outcome {
        GuessOutcome::Match => Exit::Success,
        GuessOutcome::NoMatch => Exit::Failure,
        GuessOutcome::Invalid => Exit::Invalid,
    })
}

/// Solve the stored puzzle; Ctrl+C abandons the search without touching the store
async fn solve(puzzle: &Puzzle) -> Result<Exit> {
    let obtained = puzzle.secrets.obtain_or_degrade().await?;
    println!("🔐 Target: {}", obtained.digest);
    println!("{}", StatusView::in_progress().message);

    let handle = SearchHandle::new();
    let pb = progress::search_bar(puzzle.domain().len());
    let ticker = progress::track(pb.clone(), handle.clone());

    let canceller = handle.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let start = Instant::now();
    let result = puzzle.engine.search_with(&obtained.digest, &handle).await;
    pb.finish_and_clear();
    interrupt.abort();
    let _ = ticker.await;

    let outcome = result?;
    report(outcome, puzzle.domain(), start.elapsed());
    Ok(exit_for_outcome(outcome))
}

async fn crack_digest(target: Digest, domain: SearchDomain, threads: usize) -> Result<Exit> {
    println!("🔍 PinHash Cracker");
    println!("==================");
    println!("Target: {}", target);
    println!("Domain: {} ({} candidates)", domain, format_number(domain.len()));
    println!(
        "Threads: {}",
        if threads == 0 { crack::num_cpus() } else { threads }
    );
    println!();

    let handle = SearchHandle::new();
    let pb = progress::search_bar(domain.len());
    let ticker = progress::track(pb.clone(), handle.clone());

    let start = Instant::now();
    let worker = {
        let handle = handle.clone();
        tokio::task::spawn_blocking(move || crack::crack(&target, domain, threads, &handle))
    };
    let result = tokio::select! {
        joined = worker => joined.context("crack worker panicked")?,
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            Ok(SearchOutcome::Cancelled { attempts: handle.attempts() })
        }
    };
    pb.finish_and_clear();
    let _ = ticker.await;

    let outcome = result?;
    report(outcome, domain, start.elapsed());
    Ok(exit_for_outcome(outcome))
}

fn report(outcome: SearchOutcome, domain: SearchDomain, elapsed: std::time::Duration) {
    let status = StatusView::for_search(outcome);
    match outcome {
        SearchOutcome::Found { .. } => println!("✅ {}", status.message),
        SearchOutcome::NotFound { .. } => {
            println!("❌ {}", status.message);
            println!("   Searched {}; a digest of a value outside it cannot be found.", domain);
        }
        SearchOutcome::Cancelled { .. } => println!("⏹️  {}", status.message),
    }

    println!();
    println!("📊 Statistics:");
    println!("   Attempts: {}", format_number(outcome.attempts()));
    println!("   Time: {:.2?}", elapsed);
    println!("   Rate: {}/s", format_number(rate(outcome.attempts(), elapsed)));
}

fn exit_for_outcome(outcome: SearchOutcome) -> Exit {
    match outcome {
        SearchOutcome::Found { .. } => Exit::Success,
        SearchOutcome::NotFound { .. } => Exit::Invalid,
        SearchOutcome::Cancelled { .. } => Exit::Failure,
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    use pinhash_common::{MemoryStore, Store, digest_of};

    async fn puzzle_for(secret: u32) -> Puzzle {
        let store = Arc::new(MemoryStore::new());
        store.set("sha256", digest_of(secret).as_str()).await.unwrap();
        Puzzle::sha256(store)
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["pin-cracker", "crack", "--digest", "ab", "--max", "9999"]);
        match args.command {
            Command::Crack { min, max, threads, .. } => {
                assert_eq!((min, max, threads), (100, 9999, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_guess_exit_codes() {
        let puzzle = puzzle_for(137).await;
        assert_eq!(guess(&puzzle, "137").await.unwrap(), Exit::Success);
        assert_eq!(guess(&puzzle, "1x3y7").await.unwrap(), Exit::Success);
        assert_eq!(guess(&puzzle, "138").await.unwrap(), Exit::Failure);
        assert_eq!(guess(&puzzle, "42").await.unwrap(), Exit::Invalid);
    }

    #[test]
    fn test_error_exit_codes() {
        let invalid = anyhow::Error::from(PinHashError::InvalidDigest("x".into()));
        assert_eq!(exit_for_error(&invalid), Exit::Invalid);

        let fault = anyhow::Error::from(PinHashError::InternalFault("x".into()));
        assert_eq!(exit_for_error(&fault), Exit::Fault);
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(
            exit_for_outcome(SearchOutcome::Found { value: 1, attempts: 1 }),
            Exit::Success
        );
        assert_eq!(
            exit_for_outcome(SearchOutcome::NotFound { attempts: 900 }),
            Exit::Invalid
        );
    }

    #[tokio::test]
    async fn test_file_store_round_trip_through_cli_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let first = Puzzle::sha256(Arc::new(FileStore::new(&path)));
        let digest = first.secrets.obtain_digest().await.unwrap();

        let second = Puzzle::sha256(Arc::new(FileStore::new(&path)));
        assert_eq!(second.secrets.obtain_digest().await.unwrap(), digest);

        second.secrets.reset().await.unwrap();
        assert!(!path.exists());
    }
}
