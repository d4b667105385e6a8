//! Materializes every declared dependency under the workspace root.
//!
//! Each dependency directory is owned by the installer: whatever is there is
//! deleted and re-cloned, so two runs with the same config leave the same tree.

pub mod credentials;

pub use credentials::CloneCredentials;

use crate::error::provisioning::ProvisioningError;
use crate::vcs::{CloneStrategy, VersionControl};

use common::ErrorLocation;
use models::{DependencySet, DependencySpec};

use std::io::ErrorKind;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info};

pub struct DependencyInstaller<V> {
    vcs: V,
    root: PathBuf,
    credentials: CloneCredentials,
}

impl<V: VersionControl> DependencyInstaller<V> {
    pub fn new(vcs: V, root: impl Into<PathBuf>, credentials: CloneCredentials) -> Self {
        Self {
            vcs,
            root: root.into(),
            credentials,
        }
    }

    /// Install every dependency in order. The first failure aborts the rest.
    ///
    /// # Returns
    ///
    /// The installed directories, in installation order.
    pub async fn install_all(
        &self,
        dependencies: &DependencySet,
    ) -> Result<Vec<PathBuf>, ProvisioningError> {
        let mut installed = Vec::with_capacity(dependencies.len());

        for (name, spec) in dependencies {
            installed.push(self.install(name, spec).await?);
        }

        info!("Installed {} dependencies", installed.len());
        Ok(installed)
    }

    /// Delete `{root}/{name}` if present and clone `spec` into it.
    pub async fn install(
        &self,
        name: &str,
        spec: &DependencySpec,
    ) -> Result<PathBuf, ProvisioningError> {
        let destination = self.root.join(name);

        info!("Cloning {name} at {}", spec.revision());
        remove_existing(&destination)?;

        let url = self.credentials.clone_url(spec.url())?;
        if url.has_credentials() {
            debug!("Using clone token for {name}");
        }

        let strategy = CloneStrategy::for_spec(spec);
        self.vcs
            .clone_repository(name, &url, &destination, &strategy)
            .await?;

        if let DependencySpec::CommitPinned { commit, .. } = spec {
            info!("Checking out {commit} in {name}");
            self.vcs.checkout(name, &destination, commit).await?;
        }

        Ok(destination)
    }
}

/// Remove a previous install. A missing path is fine; files and symlinks are
/// left in place and reported.
#[track_caller]
pub(crate) fn remove_existing(path: &Path) -> Result<(), ProvisioningError> {
    let result = match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => {
            return Err(ProvisioningError::OccupiedTarget {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            debug!("Removed previous install at {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ProvisioningError::RemoveDirectory {
            path: path.to_path_buf(),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        }),
    }
}
