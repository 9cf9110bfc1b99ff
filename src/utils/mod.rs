//! Utility functions for droid-doctor
//! Command execution with timeout, plus the [`CommandRunner`] seam the checks
//! use so tests can substitute a fake `sdkmanager`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

use crate::error::{DoctorError, Result};

/// Default timeout for external commands (30 seconds)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of running a command with timeout
#[derive(Debug)]
pub enum CommandResult {
    /// Command completed successfully with output
    Success(Output),
    /// Command failed with output
    Failed(Output),
    /// Command timed out and was killed
    TimedOut,
    /// Command could not be started
    SpawnError(String),
}

impl CommandResult {
    /// Convert into captured stdout, treating anything but success as an error
    pub fn into_stdout(self, cmd: &str, timeout: Duration) -> Result<String> {
        match self {
            CommandResult::Success(output) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
            CommandResult::Failed(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let code = output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                Err(DoctorError::process(
                    cmd,
                    format!("exited with {}: {}", code, stderr.trim()),
                ))
            }
            CommandResult::TimedOut => Err(DoctorError::process(
                cmd,
                format!("timed out after {:?}", timeout),
            )),
            CommandResult::SpawnError(e) => Err(DoctorError::process(cmd, e)),
        }
    }
}

/// Run a command with a timeout
///
/// # Arguments
/// * `cmd` - The command to run
/// * `args` - Arguments to pass to the command
/// * `timeout` - Maximum time to wait for the command
pub fn run_command_with_timeout(cmd: &str, args: &[&str], timeout: Duration) -> CommandResult {
    // On Windows, run through cmd.exe so sdkmanager.bat resolves from PATH
    #[cfg(windows)]
    let mut child = {
        match Command::new("cmd")
            .arg("/C")
            .arg(cmd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => return CommandResult::SpawnError(format!("Failed to start '{}': {}", cmd, e)),
        }
    };

    #[cfg(not(windows))]
    let mut child = match Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => return CommandResult::SpawnError(format!("Failed to start '{}': {}", cmd, e)),
    };

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let output = match child.wait_with_output() {
                Ok(o) => o,
                Err(e) => {
                    return CommandResult::SpawnError(format!(
                        "Failed to get output from '{}': {}",
                        cmd, e
                    ))
                }
            };

            if status.success() {
                CommandResult::Success(output)
            } else {
                CommandResult::Failed(output)
            }
        }
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait(); // Reap the zombie process
            CommandResult::TimedOut
        }
        Err(e) => CommandResult::SpawnError(format!("Failed to wait for '{}': {}", cmd, e)),
    }
}

/// Runs an external command and returns its captured stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, cmd: &str, args: &[&str]) -> Result<String>;
}

/// Runs real processes with a timeout on the blocking thread pool
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, cmd: &str, args: &[&str]) -> Result<String> {
        let timeout = self.timeout;
        let owned_cmd = cmd.to_string();
        let owned_args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

        tracing::debug!("running {} {}", cmd, args.join(" "));

        let result = tokio::task::spawn_blocking(move || {
            let args: Vec<&str> = owned_args.iter().map(String::as_str).collect();
            run_command_with_timeout(&owned_cmd, &args, timeout)
        })
        .await
        .map_err(|e| DoctorError::process(cmd, format!("runner task failed: {}", e)))?;

        result.into_stdout(cmd, timeout)
    }
}

/// Locate the `sdkmanager` executable
///
/// Order: explicit override, `PATH`, then the command-line tools inside the
/// SDK root.
pub fn locate_sdk_manager(override_path: Option<&Path>, android_home: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }

    if let Ok(path) = which::which("sdkmanager") {
        return path;
    }

    if let Some(home) = android_home {
        let binary = if cfg!(windows) { "sdkmanager.bat" } else { "sdkmanager" };
        let candidates = [
            home.join("cmdline-tools").join("latest").join("bin").join(binary),
            home.join("tools").join("bin").join(binary),
        ];
        if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
            return found;
        }
    }

    // Let the spawn fail with a clear "not found" if nothing matched
    PathBuf::from("sdkmanager")
}
