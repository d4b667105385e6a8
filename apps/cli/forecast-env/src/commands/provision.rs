use crate::cli::ProvisionArgs;
use crate::error::ForecastEnvError;

use provision_core::config::data_warehouse::process_environment;
use provision_core::pipeline::{self, PipelineOptions};
use provision_core::vcs::git::GitCli;

use std::path::{Path, PathBuf};

use log::info;

fn options(root: &Path, args: &ProvisionArgs) -> PipelineOptions {
    PipelineOptions::new(root)
        .with_local(args.local.is_yes())
        .with_token(args.token())
}

/// Full run. Unclassified warehouse failures are echoed to stderr.
pub async fn prepare(root: &Path, args: &ProvisionArgs) -> Result<PathBuf, ForecastEnvError> {
    let options = options(root, args);
    let lookup = process_environment(root);
    let mut stderr = std::io::stderr();

    let output = pipeline::run(GitCli::new(), &options, lookup, &mut stderr).await?;
    Ok(output)
}

/// Dependencies only.
pub async fn install(root: &Path, args: &ProvisionArgs) -> Result<Vec<PathBuf>, ForecastEnvError> {
    let installed = pipeline::install_dependencies(GitCli::new(), &options(root, args)).await?;
    info!("Local environment prepared in {}", root.display());
    Ok(installed)
}
