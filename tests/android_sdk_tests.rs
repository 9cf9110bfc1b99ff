//! Android SDK health check tests
//!
//! The project directory is a temp dir and `sdkmanager` is a fake runner, so
//! nothing here depends on the machine's SDK.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use droid_doctor::environment::{SdkComponent, BUILD_TOOLS};
use droid_doctor::error::{DoctorError, Result};
use droid_doctor::{
    AndroidSdkCheck, CommandRunner, EnvironmentInfo, MemorySink, NoopLoader, ProjectRoot, SdkInfo,
};

const BUILD_GRADLE: &str = r#"
        buildscript {
          ext {
            buildToolsVersion = "28.0.3"
            minSdkVersion = 16
            compileSdkVersion = 28
            targetSdkVersion = 28
          }
        }
      "#;

/// Returns canned stdout (or an error) and counts invocations
struct FakeSdkManager {
    stdout: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl FakeSdkManager {
    fn with_stdout(stdout: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = Self {
            stdout: Some(stdout.to_string()),
            calls: calls.clone(),
        };
        (runner, calls)
    }

    fn failing() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = Self {
            stdout: None,
            calls: calls.clone(),
        };
        (runner, calls)
    }
}

#[async_trait]
impl CommandRunner for FakeSdkManager {
    async fn run(&self, cmd: &str, args: &[&str]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(args, ["--list_installed"]);
        self.stdout
            .clone()
            .ok_or_else(|| DoctorError::process(cmd, "exited with 1: license not accepted"))
    }
}

/// Helper to set up a project with android/build.gradle
fn setup_project(build_gradle: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let android = dir.path().join("android");
    fs::create_dir_all(&android).expect("Failed to create android dir");
    fs::write(android.join("build.gradle"), build_gradle).expect("Failed to write build.gradle");
    dir
}

fn env_with_build_tools(versions: &[&str]) -> EnvironmentInfo {
    let mut components = BTreeMap::new();
    components.insert(
        BUILD_TOOLS.to_string(),
        SdkComponent::Versions(versions.iter().map(|v| v.to_string()).collect()),
    );
    EnvironmentInfo::default().with_android_sdk(SdkInfo::Installed(components))
}

fn check_for(dir: &TempDir, runner: FakeSdkManager) -> AndroidSdkCheck {
    AndroidSdkCheck::new(ProjectRoot::fixed(dir.path()), Box::new(runner))
}

// ============================================================================
// getDiagnostics
// ============================================================================

#[tokio::test]
async fn test_needs_fix_when_android_sdk_not_installed() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::with_stdout("");
    let check = check_for(&dir, runner);
    let env = EnvironmentInfo::default().with_android_sdk(SdkInfo::not_found());

    let diagnostics = check.get_diagnostics(&env).await;

    assert!(diagnostics.needs_to_be_fixed);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "sdkmanager must not run");
    assert_eq!(diagnostics.version.as_deref(), Some("Not Found"));
    assert_eq!(diagnostics.version_range.as_deref(), Some("28.0.3"));
}

#[tokio::test]
async fn test_needs_fix_when_android_sdk_missing_from_environment() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = check_for(&dir, runner);

    let diagnostics = check.get_diagnostics(&EnvironmentInfo::default()).await;

    assert!(diagnostics.needs_to_be_fixed);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_needs_fix_when_version_not_in_range() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::with_stdout("build-tools;25.0.3");
    let check = check_for(&dir, runner);

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["25.0.3"])).await;

    assert!(diagnostics.needs_to_be_fixed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(diagnostics.version.as_deref(), Some("25.0.3"));
}

#[tokio::test]
async fn test_passes_when_version_in_range() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, _calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = check_for(&dir, runner);

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(!diagnostics.needs_to_be_fixed);
    assert_eq!(diagnostics.version.as_deref(), Some("28.0.3"));
    assert_eq!(diagnostics.version_range.as_deref(), Some("28.0.3"));
}

#[tokio::test]
async fn test_uses_sdkmanager_output_over_environment_snapshot() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, _calls) = FakeSdkManager::with_stdout(
        "Installed packages:\n  build-tools;25.0.3 | 25.0.3 | Android SDK Build-Tools 25.0.3 | build-tools/25.0.3\n",
    );
    let check = check_for(&dir, runner);

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(diagnostics.needs_to_be_fixed);
}

#[tokio::test]
async fn test_needs_fix_when_build_gradle_not_found() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = check_for(&dir, runner);

    fs::remove_file(dir.path().join("android/build.gradle")).unwrap();

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(diagnostics.needs_to_be_fixed);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_needs_fix_when_project_root_missing() {
    let dir = TempDir::new().unwrap();
    let (runner, _calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = AndroidSdkCheck::new(ProjectRoot::fixed(dir.path().join("gone")), Box::new(runner));

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(diagnostics.needs_to_be_fixed);
}

#[tokio::test]
async fn test_needs_fix_when_build_tools_version_not_declared() {
    let dir = setup_project("buildscript {\n  ext {\n    minSdkVersion = 21\n  }\n}\n");
    let (runner, calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = check_for(&dir, runner);

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(diagnostics.needs_to_be_fixed);
    assert_eq!(diagnostics.version_range, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_needs_fix_when_build_tools_version_is_not_a_release() {
    for declared in ["30.0.0-rc1", "28.0"] {
        let dir = setup_project(&format!(
            "buildscript {{\n  ext {{\n    buildToolsVersion = \"{}\"\n  }}\n}}\n",
            declared
        ));
        let (runner, calls) = FakeSdkManager::with_stdout("build-tools;30.0.0-rc1\nbuild-tools;28.0.3");
        let check = check_for(&dir, runner);

        let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

        assert!(diagnostics.needs_to_be_fixed, "{} must not pass", declared);
        assert_eq!(diagnostics.version_range.as_deref(), Some(declared));
        assert_eq!(diagnostics.version, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "sdkmanager must not run");
    }
}

#[tokio::test]
async fn test_needs_fix_when_sdkmanager_fails() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::failing();
    let check = check_for(&dir, runner);

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(diagnostics.needs_to_be_fixed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(diagnostics.version_range.as_deref(), Some("28.0.3"));
}

#[tokio::test]
async fn test_diagnostics_are_repeatable() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = check_for(&dir, runner);
    let env = env_with_build_tools(&["28.0.3"]);

    let first = check.get_diagnostics(&env).await;
    let second = check.get_diagnostics(&env).await;

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_discovered_project_root() {
    let dir = setup_project(BUILD_GRADLE);
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    let nested = dir.path().join("src").join("screens");
    fs::create_dir_all(&nested).unwrap();

    let (runner, _calls) = FakeSdkManager::with_stdout("build-tools;28.0.3");
    let check = AndroidSdkCheck::new(ProjectRoot::discover_from(&nested), Box::new(runner));

    let diagnostics = check.get_diagnostics(&env_with_build_tools(&["28.0.3"])).await;

    assert!(!diagnostics.needs_to_be_fixed);
}

// ============================================================================
// runAutomaticFix
// ============================================================================

#[test]
fn test_logs_manual_installation_steps() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, calls) = FakeSdkManager::with_stdout("");
    let check = check_for(&dir, runner);
    let env = EnvironmentInfo::default().with_android_sdk(SdkInfo::not_found());
    let mut loader = NoopLoader;
    let mut sink = MemorySink::default();

    check.run_automatic_fix(&mut loader, &env, &mut sink);

    assert_eq!(sink.messages.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let message = &sink.messages[0];
    assert_eq!(message.healthcheck, "Android SDK");
    assert_eq!(message.command.as_deref(), Some("sdkmanager \"build-tools;28.0.3\""));
}

#[test]
fn test_each_fix_call_logs_exactly_one_message() {
    let dir = setup_project(BUILD_GRADLE);
    let (runner, _calls) = FakeSdkManager::with_stdout("");
    let check = check_for(&dir, runner);
    let env = env_with_build_tools(&["25.0.3"]);
    let mut loader = NoopLoader;
    let mut sink = MemorySink::default();

    check.run_automatic_fix(&mut loader, &env, &mut sink);
    check.run_automatic_fix(&mut loader, &env, &mut sink);

    assert_eq!(sink.messages.len(), 2);
    assert_eq!(sink.messages[0], sink.messages[1]);
    assert!(sink.messages[0]
        .steps
        .iter()
        .any(|s| s.contains("25.0.3") && s.contains("28.0.3")));
}

#[test]
fn test_fix_without_build_gradle_still_logs() {
    let dir = TempDir::new().unwrap();
    let (runner, _calls) = FakeSdkManager::with_stdout("");
    let check = check_for(&dir, runner);
    let mut loader = NoopLoader;
    let mut sink = MemorySink::default();

    check.run_automatic_fix(&mut loader, &EnvironmentInfo::default(), &mut sink);

    assert_eq!(sink.messages.len(), 1);
    assert_eq!(sink.messages[0].command, None);
}
