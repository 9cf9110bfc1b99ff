pub mod android_sdk;
pub mod version_range;

use serde::Serialize;

use crate::config::DoctorConfig;
use crate::environment::EnvironmentInfo;

pub use android_sdk::AndroidSdkCheck;

/// Outcome of a single health check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub needs_to_be_fixed: bool,
    /// Detected version(s), or the not-found marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Required version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,
}

impl DiagnosticResult {
    pub fn needs_fix() -> Self {
        Self {
            needs_to_be_fixed: true,
            version: None,
            version_range: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn with_version_range(mut self, range: &str) -> Self {
        self.version_range = Some(range.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSeverity {
    Pass,
    Error,
}

/// A diagnostic labelled for the doctor report
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub severity: CheckSeverity,
    pub message: String,
    pub suggested_fix: Option<String>,
    pub diagnostic: DiagnosticResult,
}

impl CheckResult {
    pub fn from_diagnostic(name: &str, description: &str, diagnostic: DiagnosticResult) -> Self {
        let severity = if diagnostic.needs_to_be_fixed {
            CheckSeverity::Error
        } else {
            CheckSeverity::Pass
        };

        let message = match (&diagnostic.version, &diagnostic.version_range) {
            (Some(version), Some(range)) => format!("Versions found: {} - Version supported: {}", version, range),
            (Some(version), None) => format!("Versions found: {}", version),
            (None, Some(range)) => format!("Versions found: N/A - Version supported: {}", range),
            (None, None) if diagnostic.needs_to_be_fixed => {
                "Could not determine the required build-tools version".to_string()
            }
            (None, None) => String::new(),
        };

        Self {
            name: name.to_string(),
            description: description.to_string(),
            severity,
            message,
            suggested_fix: None,
            diagnostic,
        }
    }

    pub fn with_fix(mut self, fix: &str) -> Self {
        self.suggested_fix = Some(fix.to_string());
        self
    }

    pub fn needs_to_be_fixed(&self) -> bool {
        self.diagnostic.needs_to_be_fixed
    }
}

/// Run every enabled health check against `env`
pub async fn run_all_checks(
    android_sdk: &AndroidSdkCheck,
    env: &EnvironmentInfo,
    config: &Option<DoctorConfig>,
) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let disabled = config
        .as_ref()
        .is_some_and(|cfg| cfg.is_check_disabled(android_sdk.label()));

    if disabled {
        tracing::debug!("{} check disabled by config", android_sdk.label());
    } else {
        let diagnostic = android_sdk.get_diagnostics(env).await;
        let mut result =
            CheckResult::from_diagnostic(android_sdk.label(), android_sdk.description(), diagnostic);
        if result.needs_to_be_fixed() {
            result = result.with_fix("droid-doctor fix");
        }
        results.push(result);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_diagnostic_is_error() {
        let result = CheckResult::from_diagnostic(
            "Android SDK",
            "",
            DiagnosticResult::needs_fix()
                .with_version("25.0.3")
                .with_version_range("28.0.3"),
        );
        assert_eq!(result.severity, CheckSeverity::Error);
        assert_eq!(
            result.message,
            "Versions found: 25.0.3 - Version supported: 28.0.3"
        );
    }

    #[test]
    fn test_passing_diagnostic() {
        let diagnostic = DiagnosticResult {
            needs_to_be_fixed: false,
            version: Some("28.0.3".to_string()),
            version_range: Some("28.0.3".to_string()),
        };
        let result = CheckResult::from_diagnostic("Android SDK", "", diagnostic);
        assert_eq!(result.severity, CheckSeverity::Pass);
        assert!(!result.needs_to_be_fixed());
    }

    #[test]
    fn test_diagnostic_serializes_camel_case() {
        let json = serde_json::to_value(DiagnosticResult::needs_fix().with_version_range("28.0.3")).unwrap();
        assert_eq!(json["needsToBeFixed"], true);
        assert_eq!(json["versionRange"], "28.0.3");
        assert!(json.get("version").is_none());
    }
}
