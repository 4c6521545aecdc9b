//! Progress display for downloads and release lookups

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

/// Byte progress for one download
///
/// Shows a bar when the size is known and a spinner otherwise. indicatif
/// hides both when stderr is not a terminal.
pub struct DownloadProgress {
    pb: ProgressBar,
}

impl DownloadProgress {
    pub fn new(total_bytes: Option<u64>, name: &str) -> Self {
        let pb = match total_bytes {
            Some(total) => {
                let style = ProgressStyle::default_bar()
                    .template("  [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-");
                let pb = ProgressBar::new(total);
                pb.set_style(style);
                pb
            }
            None => {
                let pb = spinner_bar();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner} {bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner())
                        .tick_strings(SPINNER_TICKS),
                );
                pb
            }
        };

        pb.set_message(name.to_string());
        Self { pb }
    }

    pub fn advance(&self, bytes: u64) {
        self.pb.inc(bytes);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Leave the bar where it stopped
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

/// Spinner shown while waiting on a network call
pub fn spinner(message: &str) -> ProgressBar {
    let pb = spinner_bar();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_TICKS),
    );
    pb.set_message(message.to_string());
    pb
}

fn spinner_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
