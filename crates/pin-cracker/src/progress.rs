//! Progress display and number formatting.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use pinhash_common::SearchHandle;

/// Progress bar sized to the search domain
pub fn search_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Mirror a search handle's attempt counter into `pb` until the search ends
pub fn track(pb: ProgressBar, handle: SearchHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !pb.is_finished() {
            pb.set_position(handle.attempts());
            pb.set_message(format!("{} tried", format_number(handle.attempts())));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
}

pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Hashes per second, never dividing by zero
pub fn rate(attempts: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        attempts
    } else {
        (attempts as f64 / secs) as u64
    }
}
