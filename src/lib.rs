//! droid-doctor - Android SDK health check
//! Verifies that the installed Android build-tools satisfy the version a
//! project declares in `android/build.gradle`, and prints manual
//! installation steps when they do not.

pub mod checks;
pub mod config;
pub mod environment;
pub mod error;
pub mod gradle;
pub mod loader;
pub mod output;
pub mod project;
pub mod repair;
pub mod utils;

// Re-export main types for convenience
pub use checks::{run_all_checks, AndroidSdkCheck, CheckResult, CheckSeverity, DiagnosticResult};
pub use config::DoctorConfig;
pub use environment::{EnvironmentInfo, SdkInfo};
pub use error::DoctorError;
pub use gradle::BuildRequirement;
pub use loader::{Loader, NoopLoader, SpinnerLoader};
pub use output::{DoctorOutput, OutputFormat};
pub use project::ProjectRoot;
pub use repair::{InstallationSink, ManualInstallation, MemorySink, StdoutSink};
pub use utils::{CommandRunner, SystemRunner};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
