//! Interactive guessing session.

use std::io::{BufRead, Write};

use anyhow::Result;

use pinhash_common::{GuessOutcome, Puzzle, SearchOutcome, StatusKind, StatusView, sanitize_input};

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Already filtered to at most three digits
    Guess(String),
    Solve,
    Reset,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "solve" => Command::Solve,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Guess(sanitize_input(other)),
    }
}

/// How a session ended
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub guesses: u32,
    pub solved: bool,
}

fn print_status<W: Write>(out: &mut W, status: &StatusView) -> std::io::Result<()> {
    let icon = match status.kind {
        StatusKind::Prompt => "💡",
        StatusKind::InProgress => "🔍",
        StatusKind::Success => "🎉",
        StatusKind::Failure => "❌",
    };
    writeln!(out, "{} {}", icon, status.message)
}

async fn show_digest<W: Write>(puzzle: &Puzzle, out: &mut W) -> Result<()> {
    let obtained = puzzle.secrets.obtain_or_degrade().await?;
    writeln!(out, "{}: {}", puzzle.secrets.algorithm(), obtained.digest)?;
    if !obtained.persistent {
        writeln!(out, "⚠️  Store unavailable; this puzzle only lasts for this session")?;
    }
    Ok(())
}

/// Read commands from `input` until quit, a correct guess, or EOF
pub async fn run_session<R: BufRead, W: Write>(
    puzzle: &Puzzle,
    input: R,
    out: &mut W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    show_digest(puzzle, out).await?;
    writeln!(out, "Type a 3-digit guess, 'solve', 'reset' or 'quit'.")?;
    print_status(out, &StatusView::prompt())?;

    for line in input.lines() {
        match parse_line(&line?) {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "Commands: <3 digits> | solve | reset | quit")?;
            }
            Command::Reset => {
                if let Err(e) = puzzle.secrets.reset().await {
                    writeln!(out, "⚠️  {}", e)?;
                }
                show_digest(puzzle, out).await?;
                print_status(out, &StatusView::prompt())?;
            }
            Command::Solve => {
                print_status(out, &StatusView::in_progress())?;
                let digest = puzzle.secrets.obtain_or_degrade().await?.digest;
                let outcome = puzzle.engine.brute_force_search(&digest).await?;
                print_status(out, &StatusView::for_search(outcome))?;
                if let SearchOutcome::Found { .. } = outcome {
                    summary.solved = true;
                    break;
                }
            }
            Command::Guess(guess) => {
                let digest = puzzle.secrets.obtain_or_degrade().await?.digest;
                let outcome = puzzle.evaluator.evaluate(&guess, &digest)?;
                if outcome != GuessOutcome::Invalid {
                    summary.guesses += 1;
                }
                print_status(out, &StatusView::for_guess(outcome))?;
                if outcome == GuessOutcome::Match {
                    summary.solved = true;
                    break;
                }
            }
        }
    }

    Ok(summary)
}
