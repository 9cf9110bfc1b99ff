//! Progress feedback shown while a fix runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start/finish handle for user feedback
pub trait Loader {
    fn start(&mut self, message: &str);
    fn succeed(&mut self, message: &str);
    fn fail(&mut self, message: &str);
}

/// Terminal spinner
pub struct SpinnerLoader {
    bar: ProgressBar,
}

impl SpinnerLoader {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }

    fn finish_with(&mut self, line: String) {
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
        self.bar.finish_with_message(line);
    }
}

impl Default for SpinnerLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for SpinnerLoader {
    fn start(&mut self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn succeed(&mut self, message: &str) {
        use colored::Colorize;
        self.finish_with(format!("{} {}", "✓".green(), message));
    }

    fn fail(&mut self, message: &str) {
        use colored::Colorize;
        self.finish_with(format!("{} {}", "✗".red(), message));
    }
}

/// Loader that records nothing and draws nothing
#[derive(Debug, Default)]
pub struct NoopLoader;

impl Loader for NoopLoader {
    fn start(&mut self, _message: &str) {}
    fn succeed(&mut self, _message: &str) {}
    fn fail(&mut self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_lifecycle() {
        let mut loader = SpinnerLoader {
            bar: ProgressBar::hidden(),
        };
        loader.start("Checking Android SDK");
        loader.fail("Android SDK");
        assert!(loader.bar.is_finished());
    }
}
