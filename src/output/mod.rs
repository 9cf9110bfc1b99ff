use chrono::Utc;
use serde::Serialize;

use crate::checks::{CheckResult, CheckSeverity};

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Standardized output envelope for all commands
#[derive(Debug, Clone, Serialize)]
pub struct DoctorOutput {
    pub command: String,
    pub success: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl DoctorOutput {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            checks: Vec::new(),
            data: None,
        }
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn with_checks(mut self, checks: Vec<CheckResult>) -> Self {
        self.checks = checks;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pass/error counts for the summary line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub errors: usize,
}

impl Summary {
    pub fn of(results: &[CheckResult]) -> Self {
        let passed = results
            .iter()
            .filter(|r| r.severity == CheckSeverity::Pass)
            .count();
        Self {
            total: results.len(),
            passed,
            errors: results.len() - passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::DiagnosticResult;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            CheckResult::from_diagnostic("a", "", DiagnosticResult::needs_fix()),
            CheckResult::from_diagnostic("b", "", DiagnosticResult::default()),
        ];
        assert_eq!(
            Summary::of(&results),
            Summary {
                total: 2,
                passed: 1,
                errors: 1
            }
        );
    }

    #[test]
    fn test_envelope_json() {
        let output = DoctorOutput::new("doctor").with_success(false);
        let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
        assert_eq!(json["command"], "doctor");
        assert_eq!(json["success"], false);
        assert!(json.get("checks").is_none());
    }
}
