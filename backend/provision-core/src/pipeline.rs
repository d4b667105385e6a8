//! The provisioning run, start to finish.
//!
//! load config → install dependencies → assemble environment → retrieve data
//! → write result. Every step runs to completion before the next starts and
//! the first error ends the run.

use crate::assembler::assemble_environment;
use crate::config::{DataWarehouseSettings, RunConfig};
use crate::data_warehouse::DataWarehouseClient;
use crate::error::CoreError;
use crate::installer::{CloneCredentials, DependencyInstaller};
use crate::output::persist_outcome;
use crate::request::load_request_batch;
use crate::vcs::VersionControl;

use common::RedactedSecret;

use std::io::Write;
use std::path::PathBuf;

use log::{debug, info};

/// Caller-supplied switches for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory holding `config.json`; every relative path resolves here.
    pub root: PathBuf,
    /// Apply `local_dependencies` over `dependencies`.
    pub local: bool,
    /// Personal access token for private repositories.
    pub token: Option<RedactedSecret>,
}

impl PipelineOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            local: true,
            token: None,
        }
    }

    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    pub fn with_token(mut self, token: Option<RedactedSecret>) -> Self {
        self.token = token;
        self
    }
}

/// Load the config and install its dependencies, nothing else.
pub async fn install_dependencies<V: VersionControl>(
    vcs: V,
    options: &PipelineOptions,
) -> Result<Vec<PathBuf>, CoreError> {
    let config = RunConfig::load(&options.root)?;
    install_from_config(vcs, &config, options).await
}

/// Run every phase.
///
/// `lookup` resolves data-warehouse environment overrides; `error_sink`
/// receives the body of an unclassified retrieval failure.
///
/// # Returns
///
/// Path of the written output file.
pub async fn run<V, F, W>(
    vcs: V,
    options: &PipelineOptions,
    lookup: F,
    error_sink: &mut W,
) -> Result<PathBuf, CoreError>
where
    V: VersionControl,
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let config = RunConfig::load(&options.root)?;
    // Resolve before touching the disk so a missing password fails first.
    let settings = DataWarehouseSettings::resolve(&config.data_warehouse, lookup)?;
    let client = DataWarehouseClient::new(&settings.base_url)?;
    debug!("Data warehouse client targets {}", client.base_url());

    install_from_config(vcs, &config, options).await?;
    assemble_environment(&options.root, &config.environment)?;

    let mut batch = load_request_batch(&options.root.join(&config.request_path))?;
    let outcome = client
        .request_data(&settings, &mut batch, &config.timestamp)
        .await?;

    let output_path = options.root.join(&config.output_path);
    let written = persist_outcome(outcome, &output_path, error_sink)?;

    info!("Forecast environment ready in {}", options.root.display());
    Ok(written)
}

async fn install_from_config<V: VersionControl>(
    vcs: V,
    config: &RunConfig,
    options: &PipelineOptions,
) -> Result<Vec<PathBuf>, CoreError> {
    let credentials = CloneCredentials::new(options.token.clone(), &config.private_url_pattern)?;
    let dependencies = config.resolved_dependencies(options.local);

    info!(
        "Installing {} dependencies ({} mode)",
        dependencies.len(),
        if options.local { "local" } else { "ci" }
    );
    if credentials.has_token() {
        debug!("Clone token available for private repositories");
    }

    let installer = DependencyInstaller::new(vcs, &options.root, credentials);
    Ok(installer.install_all(&dependencies).await?)
}
