//! Error types for droid-doctor.
//!
//! Environment conditions (missing build file, failing `sdkmanager`) are
//! absorbed into a failing [`DiagnosticResult`](crate::checks::DiagnosticResult)
//! by the probe. Only [`DoctorError::Input`] is meant to reach a caller of the
//! version checker, since it signals a contract violation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DoctorError {
    /// Project root or build file missing.
    #[error("Configuration not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// External tool could not be started, failed, or timed out.
    #[error("Failed to run '{command}': {message}")]
    ProcessInvocation { command: String, message: String },

    /// Invalid argument passed to a pure function.
    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DoctorError {
    pub fn input(message: impl Into<String>) -> Self {
        DoctorError::Input {
            message: message.into(),
        }
    }

    pub fn process(command: &str, message: impl Into<String>) -> Self {
        DoctorError::ProcessInvocation {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error describes the environment rather than a caller bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DoctorError::ConfigNotFound { .. } | DoctorError::ProcessInvocation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DoctorError>;
