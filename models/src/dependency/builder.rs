use crate::error::model_error::ModelError;
use crate::{DependencySpec, ErrorLocation};

use std::panic::Location;

/// Builder for creating validated DependencySpec instances.
///
/// Blank strings count as unset, so `"branch": ""` behaves like
/// `"branch": null`.
#[derive(Debug, Default)]
pub struct DependencySpecBuilder {
    url: Option<String>,
    branch: Option<String>,
    commitish: Option<String>,
}

impl DependencySpecBuilder {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_commitish(mut self, commitish: impl Into<String>) -> Self {
        self.commitish = Some(commitish.into());
        self
    }

    /// Build the DependencySpec with validation.
    #[track_caller]
    pub fn build(self) -> Result<DependencySpec, ModelError> {
        let url = self.url.ok_or_else(|| ModelError::Validation {
            message: String::from("Repository URL is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if url.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Repository URL cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let branch = self.branch.filter(|b| !b.trim().is_empty());
        let commitish = self.commitish.filter(|c| !c.trim().is_empty());

        match (branch, commitish) {
            (Some(branch), None) => Ok(DependencySpec::BranchPinned { url, branch }),
            (None, Some(commit)) => Ok(DependencySpec::CommitPinned { url, commit }),
            (Some(branch), Some(commit)) => Err(ModelError::Validation {
                message: format!(
                    "Dependency {url} sets both branch '{branch}' and commitish '{commit}'; set exactly one"
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
            (None, None) => Err(ModelError::Validation {
                message: format!("Dependency {url} sets neither branch nor commitish"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
