//! Project root resolution
//! The root is injected into the checks instead of read from the process
//! working directory.

use std::path::{Path, PathBuf};

/// File marking a JavaScript project root
pub const PROJECT_MARKER: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRoot {
    /// Use this directory as-is
    Fixed(PathBuf),
    /// Walk up from `from` to the nearest directory holding `package.json`
    Discover { from: PathBuf },
}

impl ProjectRoot {
    pub fn fixed(path: impl Into<PathBuf>) -> Self {
        ProjectRoot::Fixed(path.into())
    }

    pub fn discover_from(path: impl Into<PathBuf>) -> Self {
        ProjectRoot::Discover { from: path.into() }
    }

    /// Absolute project root, or `None` when it cannot be found
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            ProjectRoot::Fixed(path) => {
                let path = absolutize(path)?;
                path.is_dir().then_some(path)
            }
            ProjectRoot::Discover { from } => {
                let start = absolutize(from)?;
                start
                    .ancestors()
                    .find(|dir| dir.join(PROJECT_MARKER).is_file())
                    .map(Path::to_path_buf)
            }
        }
    }
}

fn absolutize(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else {
        std::env::current_dir().ok().map(|cwd| cwd.join(path))
    }
}
