use std::path::PathBuf;

use super::version_range::{closest_installed, is_satisfied, parse_build_tools_version};
use super::DiagnosticResult;
use crate::environment::{EnvironmentInfo, SdkComponent, SdkInfo, NOT_FOUND};
use crate::error::{DoctorError, Result};
use crate::gradle::{build_file_path, BuildRequirement};
use crate::loader::Loader;
use crate::project::ProjectRoot;
use crate::repair::{InstallationSink, ManualInstallation, ANDROID_STUDIO_URL};
use crate::utils::CommandRunner;

pub const LABEL: &str = "Android SDK";
pub const DESCRIPTION: &str = "Required for building and installing your app on Android";

/// Arguments asking `sdkmanager` for installed packages only
pub const SDK_MANAGER_ARGS: [&str; 1] = ["--list_installed"];

const BUILD_TOOLS_PREFIX: &str = "build-tools;";

/// Health check comparing installed build-tools against `android/build.gradle`
pub struct AndroidSdkCheck {
    project_root: ProjectRoot,
    runner: Box<dyn CommandRunner>,
    sdk_manager: PathBuf,
}

impl AndroidSdkCheck {
    pub fn new(project_root: ProjectRoot, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            project_root,
            runner,
            sdk_manager: PathBuf::from("sdkmanager"),
        }
    }

    pub fn with_sdk_manager(mut self, path: PathBuf) -> Self {
        self.sdk_manager = path;
        self
    }

    pub fn label(&self) -> &'static str {
        LABEL
    }

    pub fn description(&self) -> &'static str {
        DESCRIPTION
    }

    /// Diagnose the installed build-tools
    ///
    /// Environment problems never escape: a missing build file, a missing SDK
    /// or a failing `sdkmanager` all produce `needs_to_be_fixed: true`.
    pub async fn get_diagnostics(&self, env: &EnvironmentInfo) -> DiagnosticResult {
        let requirement = match self.load_requirement().await {
            Ok(req) => req,
            Err(e) => {
                log_downgraded("build requirement unavailable", &e);
                return DiagnosticResult::needs_fix();
            }
        };

        let Some(required) = requirement.build_tools_version else {
            tracing::debug!("buildToolsVersion not declared");
            return DiagnosticResult::needs_fix();
        };

        if parse_build_tools_version(&required).is_none() {
            tracing::debug!("buildToolsVersion '{}' is not a release version", required);
            return DiagnosticResult::needs_fix().with_version_range(&required);
        }

        match env.android_sdk() {
            None => {
                tracing::debug!("{} missing from environment info", LABEL);
                return DiagnosticResult::needs_fix()
                    .with_version(NOT_FOUND)
                    .with_version_range(&required);
            }
            Some(sdk) if sdk.is_not_found() => {
                tracing::debug!("{} reported as not found, skipping sdkmanager", LABEL);
                return DiagnosticResult::needs_fix()
                    .with_version(NOT_FOUND)
                    .with_version_range(&required);
            }
            Some(_) => {}
        }

        let installed = match self.installed_build_tools().await {
            Ok(versions) => versions,
            Err(e) => {
                log_downgraded("could not list installed build-tools", &e);
                return DiagnosticResult::needs_fix().with_version_range(&required);
            }
        };

        tracing::debug!(
            "installed build-tools: [{}], required: {}",
            installed.join(", "),
            required
        );

        let satisfied = match is_satisfied(installed.as_slice(), &required) {
            Ok(satisfied) => satisfied,
            Err(e) => {
                tracing::warn!("build-tools comparison failed: {}", e);
                false
            }
        };

        let result = DiagnosticResult {
            needs_to_be_fixed: !satisfied,
            version: None,
            version_range: Some(required),
        };

        if installed.is_empty() {
            result
        } else {
            result.with_version(&installed.join(", "))
        }
    }

    /// Stop the loader and print manual instructions
    ///
    /// Build-tools cannot be installed silently, so this always emits exactly
    /// one manual installation message.
    pub fn run_automatic_fix(
        &self,
        loader: &mut dyn Loader,
        env: &EnvironmentInfo,
        sink: &mut dyn InstallationSink,
    ) {
        loader.fail(LABEL);

        let required = self
            .project_root
            .resolve()
            .and_then(|root| BuildRequirement::load(&root).ok().flatten())
            .and_then(|req| req.build_tools_version);

        sink.log_manual_installation(&manual_installation(required.as_deref(), env));
    }

    async fn load_requirement(&self) -> Result<BuildRequirement> {
        let root = self.project_root.resolve().ok_or_else(|| DoctorError::ConfigNotFound {
            path: PathBuf::from("package.json"),
        })?;

        BuildRequirement::load_async(&root)
            .await?
            .ok_or_else(|| DoctorError::ConfigNotFound {
                path: build_file_path(&root),
            })
    }

    async fn installed_build_tools(&self) -> Result<Vec<String>> {
        let cmd = self.sdk_manager.to_string_lossy();
        let stdout = self.runner.run(&cmd, &SDK_MANAGER_ARGS).await?;
        Ok(parse_build_tools_list(&stdout))
    }
}

/// Recoverable errors log at debug, anything else at warn
fn log_downgraded(context: &str, err: &DoctorError) {
    if err.is_recoverable() {
        tracing::debug!("{}: {}", context, err);
    } else {
        tracing::warn!("{}: {}", context, err);
    }
}

/// Extract build-tools versions from `sdkmanager` output
///
/// Accepts both bare package paths (`build-tools;28.0.3`) and the table rows
/// `sdkmanager --list_installed` prints
/// (`  build-tools;28.0.3 | 28.0.3 | Android SDK Build-Tools 28.0.3 | build-tools/28.0.3`).
pub fn parse_build_tools_list(stdout: &str) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();

    for line in stdout.lines() {
        let package = line.split('|').next().unwrap_or_default().trim();
        let Some(version) = package.strip_prefix(BUILD_TOOLS_PREFIX) else {
            continue;
        };
        let version = version.trim();
        if !version.is_empty() && !versions.iter().any(|v| v == version) {
            versions.push(version.to_string());
        }
    }

    versions
}

fn manual_installation(required: Option<&str>, env: &EnvironmentInfo) -> ManualInstallation {
    let mut message = ManualInstallation::new(LABEL).with_url(ANDROID_STUDIO_URL);

    if let Some(version) = required {
        message = message.with_command(&format!("sdkmanager \"build-tools;{}\"", version));
    }

    let installed = env.android_build_tools();
    if let Some(version) = required {
        if let Ok(Some(closest)) = closest_installed(installed, version) {
            message = message.with_step(&format!(
                "Build-tools {} is installed but this project requires {}",
                closest, version
            ));
        }
    }

    let sdk_path = match env.android_sdk() {
        Some(SdkInfo::Installed(components)) => match components.get("Path") {
            Some(SdkComponent::Value(path)) => Some(path.clone()),
            _ => None,
        },
        _ => None,
    };

    message = match sdk_path {
        Some(path) => message.with_step(&format!("Set ANDROID_HOME to {}", path)),
        None => message.with_step(
            "Set ANDROID_HOME to the SDK location shown in Android Studio's SDK Manager",
        ),
    };

    let path_step = if cfg!(windows) {
        "Add %ANDROID_HOME%\\platform-tools and %ANDROID_HOME%\\cmdline-tools\\latest\\bin to PATH"
    } else {
        "Add $ANDROID_HOME/platform-tools and $ANDROID_HOME/cmdline-tools/latest/bin to PATH"
    };

    message.with_step(path_step)
}
