//! Pinned external repositories a forecast run depends on.

pub mod builder;
pub mod set;

use crate::{DependencySpecBuilder, ModelError};

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// How one dependency is pinned.
///
/// The config file carries overlapping optional `branch`/`commitish` fields;
/// this type admits exactly one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySpec {
    /// Shallow clone of the tip of `branch`. The clone alone pins the revision.
    BranchPinned { url: String, branch: String },
    /// Full-history clone with the working tree populated by checking out `commit`.
    CommitPinned { url: String, commit: String },
}

impl DependencySpec {
    pub fn branch_pinned(url: impl Into<String>, branch: impl Into<String>) -> Self {
        DependencySpec::BranchPinned {
            url: url.into(),
            branch: branch.into(),
        }
    }

    pub fn commit_pinned(url: impl Into<String>, commit: impl Into<String>) -> Self {
        DependencySpec::CommitPinned {
            url: url.into(),
            commit: commit.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            DependencySpec::BranchPinned { url, .. } | DependencySpec::CommitPinned { url, .. } => {
                url
            }
        }
    }

    /// Branch name or commit-ish, whichever pins this dependency.
    pub fn revision(&self) -> &str {
        match self {
            DependencySpec::BranchPinned { branch, .. } => branch,
            DependencySpec::CommitPinned { commit, .. } => commit,
        }
    }
}

impl Display for DependencySpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            DependencySpec::BranchPinned { url, branch } => {
                write!(formatter, "{url} (branch {branch})")
            }
            DependencySpec::CommitPinned { url, commit } => {
                write!(formatter, "{url} (commit {commit})")
            }
        }
    }
}

/// Dependency entry exactly as written in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub url: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub commitish: Option<String>,
}

impl TryFrom<DependencyRecord> for DependencySpec {
    type Error = ModelError;

    #[track_caller]
    fn try_from(record: DependencyRecord) -> Result<Self, Self::Error> {
        let mut builder = DependencySpecBuilder::default().with_url(record.url);
        if let Some(branch) = record.branch {
            builder = builder.with_branch(branch);
        }
        if let Some(commitish) = record.commitish {
            builder = builder.with_commitish(commitish);
        }
        builder.build()
    }
}

impl From<&DependencySpec> for DependencyRecord {
    fn from(spec: &DependencySpec) -> Self {
        match spec {
            DependencySpec::BranchPinned { url, branch } => DependencyRecord {
                url: url.clone(),
                branch: Some(branch.clone()),
                commitish: None,
            },
            DependencySpec::CommitPinned { url, commit } => DependencyRecord {
                url: url.clone(),
                branch: None,
                commitish: Some(commit.clone()),
            },
        }
    }
}
