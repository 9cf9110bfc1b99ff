use colored::Colorize;
use serde::Serialize;

/// Download page linked from every Android SDK remediation message
pub const ANDROID_STUDIO_URL: &str = "https://developer.android.com/studio";

/// A block of instructions the user has to follow by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualInstallation {
    /// Label of the health check this message belongs to
    pub healthcheck: String,
    pub url: Option<String>,
    pub command: Option<String>,
    pub steps: Vec<String>,
}

impl ManualInstallation {
    pub fn new(healthcheck: &str) -> Self {
        Self {
            healthcheck: healthcheck.to_string(),
            url: None,
            command: None,
            steps: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    pub fn with_step(mut self, step: &str) -> Self {
        self.steps.push(step.to_string());
        self
    }

    pub fn headline(&self) -> String {
        format!(
            "{} cannot be installed automatically. Install it manually:",
            self.healthcheck
        )
    }

    /// Every instruction in the order it should be followed
    pub fn instructions(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.steps.len() + 2);
        if let Some(url) = &self.url {
            lines.push(format!("Download {} from {}", self.healthcheck, url));
        }
        if let Some(command) = &self.command {
            lines.push(format!("Run {}", command));
        }
        lines.extend(self.steps.iter().cloned());
        lines
    }
}

/// Destination for manual installation messages
pub trait InstallationSink {
    fn log_manual_installation(&mut self, instructions: &ManualInstallation);
}

/// Prints instructions to stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl InstallationSink for StdoutSink {
    fn log_manual_installation(&mut self, instructions: &ManualInstallation) {
        println!();
        println!("{} {}", "→".cyan(), instructions.headline().bold());
        for (n, line) in instructions.instructions().iter().enumerate() {
            println!("  {}. {}", n + 1, line);
        }
        println!();
    }
}

/// Keeps every message; used by JSON output and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    pub messages: Vec<ManualInstallation>,
}

impl InstallationSink for MemorySink {
    fn log_manual_installation(&mut self, instructions: &ManualInstallation) {
        self.messages.push(instructions.clone());
    }
}
