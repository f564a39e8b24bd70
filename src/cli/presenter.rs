//! CLI presenter for output formatting

use std::sync::Mutex;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::consultation::{ConsultationOutcome, ResponseProvenance, SpeechOutcome};

/// Presenter for CLI output formatting.
///
/// Status goes to stderr; the transcript and reply go to stdout. The spinner
/// sits behind a mutex so pipeline callbacks can drive it through a shared
/// reference.
pub struct Presenter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut guard| guard.take())
    }

    /// Start a spinner with message, replacing any running one
    pub fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));

        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(old) = guard.replace(spinner) {
                old.finish_and_clear();
            }
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&self, message: &str) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&self, message: &str) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&self) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Human-readable rendering of a finished consultation
    pub fn consultation(&self, outcome: &ConsultationOutcome) {
        self.key_value("You said", &outcome.transcript);
        self.key_value(
            provenance_label(outcome.response.provenance()),
            outcome.response.text(),
        );

        if outcome.response.is_degraded() {
            self.warn("Image analysis failed; returned a fallback response");
        }

        match &outcome.speech {
            SpeechOutcome::Synthesized(audio) => {
                self.key_value("Audio", &audio.path().display().to_string());
                self.info(&format!("Spoken by {}", audio.provider()));
            }
            SpeechOutcome::Failed { reason } => {
                self.warn(&format!("No audio produced: {}", reason));
            }
        }
    }

    /// Machine-readable rendering of a finished consultation
    pub fn consultation_json(&self, outcome: &ConsultationOutcome) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string_pretty(outcome)?;
        self.output(&json);
        Ok(())
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Label for the response line, naming where the text came from
pub fn provenance_label(provenance: ResponseProvenance) -> &'static str {
    match provenance {
        ResponseProvenance::Model => "Doctor",
        ResponseProvenance::NoImageSentinel => "Doctor (no image)",
        ResponseProvenance::Degraded => "Doctor (unavailable)",
    }
}
