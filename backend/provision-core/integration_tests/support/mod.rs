//! Shared fixtures: a recording version-control fake and workspace builders.

pub mod log_capture;

use provision_core::error::provisioning::ProvisioningError;
use provision_core::vcs::{CloneStrategy, CloneUrl, VersionControl};

use common::ErrorLocation;

use std::collections::HashMap;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Clone {
        name: String,
        url: String,
        destination: PathBuf,
        strategy: CloneStrategy,
    },
    Checkout {
        name: String,
        destination: PathBuf,
        revision: String,
    },
}

/// Records every call and materializes canned files instead of cloning.
#[derive(Clone, Default)]
pub struct FakeVcs {
    calls: Arc<Mutex<Vec<VcsCall>>>,
    files: HashMap<String, Vec<(PathBuf, String)>>,
    fail_clone_of: Option<String>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of `name` will contain `relative` with `contents`.
    pub fn with_file(mut self, name: &str, relative: &str, contents: &str) -> Self {
        self.files
            .entry(name.to_string())
            .or_default()
            .push((PathBuf::from(relative), contents.to_string()));
        self
    }

    pub fn failing_clone_of(mut self, name: &str) -> Self {
        self.fail_clone_of = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn checkouts(&self) -> Vec<VcsCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, VcsCall::Checkout { .. }))
            .collect()
    }

    pub fn cloned_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::Clone { url, .. } => Some(url),
                VcsCall::Checkout { .. } => None,
            })
            .collect()
    }
}

impl VersionControl for FakeVcs {
    async fn clone_repository(
        &self,
        name: &str,
        url: &CloneUrl,
        destination: &Path,
        strategy: &CloneStrategy,
    ) -> Result<(), ProvisioningError> {
        self.calls.lock().unwrap().push(VcsCall::Clone {
            name: name.to_string(),
            url: url.expose().to_string(),
            destination: destination.to_path_buf(),
            strategy: strategy.clone(),
        });

        if self.fail_clone_of.as_deref() == Some(name) {
            return Err(ProvisioningError::Clone {
                name: name.to_string(),
                message: "fatal: repository not found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Like git, refuse to clone over an existing path.
        assert!(
            !destination.exists(),
            "clone destination {} must not exist",
            destination.display()
        );
        std::fs::create_dir_all(destination).unwrap();
        for (relative, contents) in self.files.get(name).into_iter().flatten() {
            let path = destination.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
        Ok(())
    }

    async fn checkout(
        &self,
        name: &str,
        destination: &Path,
        revision: &str,
    ) -> Result<(), ProvisioningError> {
        self.calls.lock().unwrap().push(VcsCall::Checkout {
            name: name.to_string(),
            destination: destination.to_path_buf(),
            revision: revision.to_string(),
        });
        Ok(())
    }
}

/// Write `config.json` into `root`.
pub fn write_config(root: &Path, config: &serde_json::Value) {
    std::fs::write(
        root.join("config.json"),
        serde_json::to_string_pretty(config).unwrap(),
    )
    .unwrap();
}
