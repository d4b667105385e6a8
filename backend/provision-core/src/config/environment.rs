use crate::error::config::ConfigError;

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_ENVIRONMENT_DEPENDENCY: &str = "workflow-forecast";
const DEFAULT_ENVIRONMENT_SUBDIRECTORY: &str = "environment";
const DEFAULT_ENVIRONMENT_FILES: [&str; 3] = ["startup.m", "run_forecast.m", "apply_new_judgment.m"];

/// Scripting-environment files copied from an installed dependency into the
/// workspace root before the forecast runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFiles {
    /// Installed dependency holding the files.
    #[serde(default = "default_dependency")]
    pub dependency: String,
    /// Subtree of that dependency the files live in.
    #[serde(default = "default_subdirectory")]
    pub subdirectory: PathBuf,
    /// File names, copied in this order.
    #[serde(default = "default_files")]
    pub files: Vec<String>,
}

impl Default for EnvironmentFiles {
    fn default() -> Self {
        Self {
            dependency: default_dependency(),
            subdirectory: default_subdirectory(),
            files: default_files(),
        }
    }
}

fn default_dependency() -> String {
    DEFAULT_ENVIRONMENT_DEPENDENCY.to_string()
}
fn default_subdirectory() -> PathBuf {
    PathBuf::from(DEFAULT_ENVIRONMENT_SUBDIRECTORY)
}
fn default_files() -> Vec<String> {
    DEFAULT_ENVIRONMENT_FILES.iter().map(|f| f.to_string()).collect()
}

impl EnvironmentFiles {
    /// Directory the files are copied from.
    pub fn source_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dependency).join(&self.subdirectory)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dependency.trim().is_empty() {
            return Err(ConfigError::validation(
                "environment.dependency cannot be empty",
            ));
        }

        if !is_contained(&self.subdirectory) {
            return Err(ConfigError::validation(format!(
                "environment.subdirectory '{}' must stay inside the dependency",
                self.subdirectory.display()
            )));
        }

        for file in &self.files {
            let path = Path::new(file);
            if file.is_empty() || path.components().count() != 1 || !is_contained(path) {
                return Err(ConfigError::validation(format!(
                    "environment file '{file}' must be a plain file name"
                )));
            }
        }

        Ok(())
    }
}

/// Relative path without `..` or root components.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
