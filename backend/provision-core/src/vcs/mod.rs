//! Version-control seam used by the dependency installer.
//!
//! The installer only ever needs two operations, so the trait is kept to
//! exactly those. [`git::GitCli`] drives the `git` binary; tests substitute a
//! recording fake.

pub mod git;

use crate::error::provisioning::ProvisioningError;

use common::RedactedSecret;
use models::DependencySpec;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::future::Future;
use std::path::Path;

/// How a repository is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneStrategy {
    /// Depth-1 clone of a single branch. Leaves the branch tip checked out.
    ShallowBranch { branch: String },
    /// Full commit history with the working tree left empty. Must be followed
    /// by a checkout.
    NoCheckout,
}

impl CloneStrategy {
    pub fn for_spec(spec: &DependencySpec) -> Self {
        match spec {
            DependencySpec::BranchPinned { branch, .. } => CloneStrategy::ShallowBranch {
                branch: branch.clone(),
            },
            DependencySpec::CommitPinned { .. } => CloneStrategy::NoCheckout,
        }
    }
}

/// Remote address handed to the clone, possibly carrying a credential.
///
/// Display shows the address with the credential redacted; only
/// [`CloneUrl::expose`] yields the real value.
#[derive(Clone)]
pub struct CloneUrl {
    value: String,
    secret: Option<RedactedSecret>,
}

impl CloneUrl {
    /// A URL with no embedded credential.
    pub fn plain(url: impl Into<String>) -> Self {
        Self {
            value: url.into(),
            secret: None,
        }
    }

    /// A URL that embeds `secret` somewhere in its text.
    pub fn with_secret(url: impl Into<String>, secret: RedactedSecret) -> Self {
        Self {
            value: url.into(),
            secret: Some(secret),
        }
    }

    /// The real URL, for the command line only.
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn has_credentials(&self) -> bool {
        self.secret.is_some()
    }

    /// Remove the credential from arbitrary text (e.g. git stderr).
    pub fn scrub(&self, text: &str) -> String {
        match &self.secret {
            Some(secret) => secret.scrub(text),
            None => text.to_string(),
        }
    }
}

impl Display for CloneUrl {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}", self.scrub(&self.value))
    }
}

impl std::fmt::Debug for CloneUrl {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "CloneUrl({self})")
    }
}

/// The two version-control operations the installer performs.
pub trait VersionControl {
    /// Clone `url` into `destination`, which does not exist yet.
    fn clone_repository(
        &self,
        name: &str,
        url: &CloneUrl,
        destination: &Path,
        strategy: &CloneStrategy,
    ) -> impl Future<Output = Result<(), ProvisioningError>> + Send;

    /// Check out `revision` inside an existing clone.
    fn checkout(
        &self,
        name: &str,
        destination: &Path,
        revision: &str,
    ) -> impl Future<Output = Result<(), ProvisioningError>> + Send;
}
