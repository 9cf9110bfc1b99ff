pub mod config;
pub mod doctor;
pub mod env;
pub mod fix;

use anyhow::Result;
use std::path::PathBuf;

use droid_doctor::environment::locate_android_home;
use droid_doctor::utils::locate_sdk_manager;
use droid_doctor::{AndroidSdkCheck, DoctorConfig, EnvironmentInfo, ProjectRoot, SystemRunner};

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub project_root: Option<PathBuf>,
    pub env_info: Option<PathBuf>,
}

/// Everything a check needs, resolved once per invocation
pub struct CheckContext {
    pub config: Option<DoctorConfig>,
    pub env: EnvironmentInfo,
    pub android_sdk: AndroidSdkCheck,
}

impl GlobalOptions {
    pub fn project_root(&self) -> ProjectRoot {
        match &self.project_root {
            Some(path) => ProjectRoot::fixed(path),
            None => ProjectRoot::discover_from("."),
        }
    }

    /// Directory the config file is read from
    pub fn config_dir(&self) -> PathBuf {
        self.project_root()
            .resolve()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn load_config(&self) -> Result<Option<DoctorConfig>> {
        DoctorConfig::load_if_exists(&self.config_dir())
    }

    pub fn load_environment(&self, config: &Option<DoctorConfig>) -> Result<EnvironmentInfo> {
        match &self.env_info {
            Some(path) => EnvironmentInfo::load_from(path),
            None => {
                let home = config.as_ref().and_then(|c| c.sdk.home.as_deref());
                Ok(EnvironmentInfo::detect(home))
            }
        }
    }

    pub fn check_context(&self) -> Result<CheckContext> {
        let config = self.load_config()?;
        let env = self.load_environment(&config)?;

        let settings = config.clone().unwrap_or_default();
        let android_home = locate_android_home(settings.sdk.home.as_deref());
        let sdk_manager = locate_sdk_manager(settings.sdk.manager.as_deref(), android_home.as_deref());
        tracing::debug!("using sdkmanager at {}", sdk_manager.display());

        let runner = SystemRunner::new(settings.command_timeout());
        let android_sdk = AndroidSdkCheck::new(self.project_root(), Box::new(runner))
            .with_sdk_manager(sdk_manager);

        Ok(CheckContext {
            config,
            env,
            android_sdk,
        })
    }
}
