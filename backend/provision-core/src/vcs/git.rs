use crate::error::provisioning::ProvisioningError;
use crate::vcs::{CloneStrategy, CloneUrl, VersionControl};

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;
use std::process::{Output, Stdio};

use log::{debug, info, trace};
use tokio::process::Command as TokioCommand;

pub const GIT_BINARY: &str = "git";
const CLONE_COMMAND: &str = "clone";
const CHECKOUT_COMMAND: &str = "checkout";
const DEPTH_FLAG: &str = "--depth";
const SHALLOW_DEPTH: &str = "1";
const BRANCH_FLAG: &str = "--branch";
const SINGLE_BRANCH_FLAG: &str = "--single-branch";
const NO_CHECKOUT_FLAG: &str = "--no-checkout";
// Full commit history; trees and blobs are fetched on checkout.
const TREELESS_FILTER_FLAG: &str = "--filter=tree:0";
const DIRECTORY_FLAG: &str = "-C";
const TERMINAL_PROMPT_ENV: &str = "GIT_TERMINAL_PROMPT";

/// [`VersionControl`] backed by the `git` executable on PATH.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn build_clone_command(
    url: &CloneUrl,
    destination: &Path,
    strategy: &CloneStrategy,
) -> TokioCommand {
    let mut cmd = git_command();
    cmd.arg(CLONE_COMMAND);

    match strategy {
        CloneStrategy::ShallowBranch { branch } => {
            cmd.arg(DEPTH_FLAG)
                .arg(SHALLOW_DEPTH)
                .arg(BRANCH_FLAG)
                .arg(branch)
                .arg(SINGLE_BRANCH_FLAG);
        }
        CloneStrategy::NoCheckout => {
            cmd.arg(TREELESS_FILTER_FLAG).arg(NO_CHECKOUT_FLAG);
        }
    }

    cmd.arg(url.expose()).arg(destination);
    cmd
}

pub(crate) fn build_checkout_command(destination: &Path, revision: &str) -> TokioCommand {
    let mut cmd = git_command();
    cmd.arg(DIRECTORY_FLAG)
        .arg(destination)
        .arg(CHECKOUT_COMMAND)
        .arg(revision);
    cmd
}

fn git_command() -> TokioCommand {
    let mut cmd = TokioCommand::new(GIT_BINARY);
    cmd.env(TERMINAL_PROMPT_ENV, "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

async fn run(mut cmd: TokioCommand, description: &str) -> Result<Output, ProvisioningError> {
    cmd.output().await.map_err(|e| ProvisioningError::Spawn {
        message: format!("Failed to run {GIT_BINARY} for {description}: {e}"),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    })
}

fn failure_message(output: &Output, url: Option<&CloneUrl>) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let detail = match url {
        Some(url) => url.scrub(stderr),
        None => stderr.to_string(),
    };
    format!("{GIT_BINARY} exited with {}: {detail}", output.status)
}

fn trace_output(output: &Output, url: Option<&CloneUrl>) {
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        let line = match url {
            Some(url) => url.scrub(line),
            None => line.to_string(),
        };
        trace!("git: {line}");
    }
}

impl VersionControl for GitCli {
    async fn clone_repository(
        &self,
        name: &str,
        url: &CloneUrl,
        destination: &Path,
        strategy: &CloneStrategy,
    ) -> Result<(), ProvisioningError> {
        debug!(
            "Running {GIT_BINARY} {CLONE_COMMAND} {url} -> {} ({strategy:?})",
            destination.display()
        );

        let output = run(
            build_clone_command(url, destination, strategy),
            &format!("{CLONE_COMMAND} of {name}"),
        )
        .await?;
        trace_output(&output, Some(url));

        if !output.status.success() {
            return Err(ProvisioningError::Clone {
                name: name.to_string(),
                message: failure_message(&output, Some(url)),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Cloned {name} into {}", destination.display());
        Ok(())
    }

    async fn checkout(
        &self,
        name: &str,
        destination: &Path,
        revision: &str,
    ) -> Result<(), ProvisioningError> {
        let output = run(
            build_checkout_command(destination, revision),
            &format!("{CHECKOUT_COMMAND} of {name}"),
        )
        .await?;
        trace_output(&output, None);

        if !output.status.success() {
            return Err(ProvisioningError::Checkout {
                name: name.to_string(),
                revision: revision.to_string(),
                message: failure_message(&output, None),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
