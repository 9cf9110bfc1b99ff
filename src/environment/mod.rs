//! Environment information snapshot
//! Mirrors the `SDKs` section of envinfo-style JSON so a snapshot can either be
//! detected locally or loaded from a file produced by another tool.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// SDK name used for the Android SDK entry
pub const ANDROID_SDK: &str = "Android SDK";

/// Component key listing installed build-tools versions
pub const BUILD_TOOLS: &str = "Build Tools";

/// Component key listing installed platform API levels
pub const API_LEVELS: &str = "API Levels";

/// Marker envinfo reports for missing SDKs
pub const NOT_FOUND: &str = "Not Found";

/// One entry of the `SDKs` map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SdkInfo {
    /// The literal not-found marker (or any other bare string)
    Marker(String),
    /// Installed components, e.g. `"Build Tools" -> ["28.0.3"]`
    Installed(BTreeMap<String, SdkComponent>),
}

/// A component value: a list of versions, or a single string such as a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SdkComponent {
    Versions(Vec<String>),
    Value(String),
    Other(serde_json::Value),
}

impl SdkInfo {
    pub fn not_found() -> Self {
        SdkInfo::Marker(NOT_FOUND.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            SdkInfo::Marker(m) => m.trim().eq_ignore_ascii_case(NOT_FOUND),
            SdkInfo::Installed(_) => false,
        }
    }

    pub fn versions(&self, component: &str) -> Option<&[String]> {
        match self {
            SdkInfo::Installed(components) => match components.get(component)? {
                SdkComponent::Versions(v) => Some(v),
                _ => None,
            },
            SdkInfo::Marker(_) => None,
        }
    }
}

/// Read-only snapshot consumed by the checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    #[serde(rename = "SDKs", default)]
    pub sdks: BTreeMap<String, SdkInfo>,
}

impl EnvironmentInfo {
    pub fn android_sdk(&self) -> Option<&SdkInfo> {
        self.sdks.get(ANDROID_SDK)
    }

    /// Set the Android SDK entry, builder style
    pub fn with_android_sdk(mut self, info: SdkInfo) -> Self {
        self.sdks.insert(ANDROID_SDK.to_string(), info);
        self
    }

    /// Build-tools versions known to the snapshot (may be empty)
    pub fn android_build_tools(&self) -> &[String] {
        self.android_sdk()
            .and_then(|sdk| sdk.versions(BUILD_TOOLS))
            .unwrap_or(&[])
    }

    /// Load a snapshot from envinfo JSON
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read environment info: {}", path.display()))?;

        let info: EnvironmentInfo = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse environment info: {}", path.display()))?;

        Ok(info)
    }

    /// Detect the Android SDK on this machine
    pub fn detect(sdk_home_override: Option<&Path>) -> Self {
        let sdk_info = match locate_android_home(sdk_home_override) {
            Some(home) => {
                tracing::debug!("Android SDK found at {}", home.display());
                describe_sdk(&home)
            }
            None => {
                tracing::debug!("Android SDK not found");
                SdkInfo::not_found()
            }
        };

        Self::default().with_android_sdk(sdk_info)
    }
}

/// Find the Android SDK root
///
/// Order: explicit override, `ANDROID_HOME`, `ANDROID_SDK_ROOT`, then the
/// default location Android Studio installs to.
pub fn locate_android_home(sdk_home_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = sdk_home_override {
        return path.is_dir().then(|| path.to_path_buf());
    }

    for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
        if let Ok(value) = std::env::var(var) {
            let path = PathBuf::from(value);
            if path.is_dir() {
                return Some(path);
            }
            tracing::debug!("{} points to missing directory {}", var, path.display());
        }
    }

    default_sdk_location().filter(|p| p.is_dir())
}

fn default_sdk_location() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Android").join("sdk"))
    } else if cfg!(windows) {
        dirs::data_local_dir().map(|d| d.join("Android").join("Sdk"))
    } else {
        dirs::home_dir().map(|h| h.join("Android").join("Sdk"))
    }
}

fn describe_sdk(home: &Path) -> SdkInfo {
    let mut components = BTreeMap::new();

    let mut build_tools = list_subdirectories(&home.join("build-tools"));
    build_tools.sort_by(|a, b| compare_versions(a, b));
    components.insert(BUILD_TOOLS.to_string(), SdkComponent::Versions(build_tools));

    let mut api_levels: Vec<String> = list_subdirectories(&home.join("platforms"))
        .into_iter()
        .filter_map(|name| name.strip_prefix("android-").map(str::to_string))
        .collect();
    api_levels.sort_by(|a, b| compare_versions(a, b));
    components.insert(API_LEVELS.to_string(), SdkComponent::Versions(api_levels));

    components.insert(
        "Path".to_string(),
        SdkComponent::Value(home.display().to_string()),
    );

    SdkInfo::Installed(components)
}

fn list_subdirectories(dir: &Path) -> Vec<String> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| e.file_name().to_str().map(String::from))
        .collect()
}

/// Numeric-aware ordering so `9.0.0` sorts before `28.0.3`
fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    let key = |s: &str| -> Vec<u64> { s.split(['.', '-']).filter_map(|p| p.parse().ok()).collect() };
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}
