//! CLI presenter for output formatting
//!
//! Messages go to stderr, listings to stdout. While something is recording or
//! playing, a spinner line on stderr shows the live timers.

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::recording::{Duration, RecordingItem};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Show, update or remove the live status line
    pub fn live_status(&mut self, line: Option<String>) {
        match (line, &self.spinner) {
            (Some(line), Some(spinner)) => spinner.set_message(line),
            (Some(line), None) => self.start_spinner(&line),
            (None, _) => self.stop_spinner(),
        }
    }

    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Run `print` without the spinner redrawing over it
    fn print_above(&self, print: impl FnOnce()) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(print),
            None => print(),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_above(|| eprintln!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_above(|| eprintln!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print_above(|| eprintln!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_above(|| eprintln!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        self.print_above(|| {
            println!("{}", text);
            let _ = io::stdout().flush();
        });
    }

    /// Print a key-value pair (for config list and status)
    pub fn key_value(&self, key: &str, value: &str) {
        self.print_above(|| println!("{}: {}", key.cyan(), value));
    }

    /// Print recordings with their 1-based numbers; `playing` is highlighted
    pub fn recordings<'a>(
        &self,
        items: impl IntoIterator<Item = (usize, &'a RecordingItem)>,
        playing: Option<usize>,
    ) {
        let mut any = false;
        for (index, item) in items {
            any = true;
            self.output(&format_row(index, item, playing == Some(index)));
        }
        if !any {
            self.output("(no recordings)");
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// `"  2. Recording #2 | 0:07"`, with a marker on the playing row
pub fn format_row(index: usize, item: &RecordingItem, playing: bool) -> String {
    let marker = if playing { "▶" } else { " " };
    format!("{} {:>2}. {}", marker, index + 1, item)
}

/// `"● REC 0:05 / 30:00"`
pub fn format_recording_timer(elapsed: Duration, max: Duration, paused: bool) -> String {
    let label = if paused {
        "❚❚ PAUSED".yellow()
    } else {
        "● REC".red()
    };
    format!("{} {} / {}", label, elapsed.format_clock(), max.format_clock())
}

/// `"▶ Recording #1 0:03 / 0:10"`
pub fn format_playback_timer(name: &str, position: Duration, total: Duration) -> String {
    format!(
        "{} {} {} / {}",
        "▶".green(),
        name,
        position.format_clock(),
        total.format_clock()
    )
}
