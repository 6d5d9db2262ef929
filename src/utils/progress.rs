//! Progress indicators for long-running pipeline phases.
//!
//! A thin wrapper around `indicatif` spinners with consistent styling.
//! Indicators disable themselves when the `SPROUT_NO_PROGRESS` environment
//! variable is set, keeping output clean in scripts and CI.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

fn is_progress_disabled() -> bool {
    std::env::var("SPROUT_NO_PROGRESS").is_ok()
}

/// A spinner for indeterminate work (downloads, installs).
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Create a spinner with the given message, already ticking.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let inner = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(
                IndicatifStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| IndicatifStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        inner.set_message(message.into());
        Self { inner }
    }

    /// Replace the spinner message.
    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.set_message(message.into());
    }

    /// Stop the spinner and print a final message.
    pub fn finish_with_message(&self, message: impl Into<String>) {
        self.inner.finish_with_message(message.into());
    }

    /// Stop the spinner and erase it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}
