use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} Analisi [{bar:40.cyan/blue}] {pos}/{len} file ({percent}%) {wide_msg}";

/// Progress bar for extraction.
///
/// Disabled in quiet mode or when stderr is not a TTY. The length is unknown
/// until discovery finishes, so it starts as a spinner.
pub struct ScanProgress {
    progress_bar: ProgressBar,
}

impl ScanProgress {
    pub fn new(quiet: bool) -> Self {
        Self::new_with_visibility(quiet, std::io::stderr().is_terminal())
    }

    fn new_with_visibility(quiet: bool, is_tty: bool) -> Self {
        let progress_bar = if quiet || !is_tty {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
                pb.set_style(style.progress_chars("█▓░"));
            }
            pb
        };
        Self { progress_bar }
    }

    /// Sets the number of candidates once discovery is done.
    pub fn set_total(&self, total: usize) {
        self.progress_bar.set_length(total as u64);
    }

    pub fn inc(&self, message: impl Into<String>) {
        self.progress_bar.set_message(message.into());
        self.progress_bar.inc(1);
    }

    pub fn set_message(&self, message: &'static str) {
        self.progress_bar.set_message(message);
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    /// Stops the bar where it is, leaving `message` on screen.
    pub fn abandon(&self, message: String) {
        self.progress_bar.abandon_with_message(message);
    }

    /// Finishes the progress bar and clears it from the terminal.
    ///
    /// An abandoned bar is left as it is.
    pub fn finish(&self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }
}
