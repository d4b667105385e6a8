//! Command-line arguments.

use crate::error::ForecastEnvError;

use common::RedactedSecret;
use provision_core::error::CoreError;
use provision_core::error::config::ConfigError;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Provision a forecast-run workspace.
#[derive(Parser, Debug)]
#[command(
    name = "forecast-env",
    version,
    about = "Prepare a forecast-run workspace: dependencies, environment files and input data",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Workspace root holding config.json (defaults to the executable's directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log at debug level regardless of build profile
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install dependencies, copy the environment files and retrieve input data
    Prepare(ProvisionArgs),
    /// Install dependencies only
    Install(ProvisionArgs),
    /// Apply parameters to a data-request file and fill blank snapshot times
    StampRequest(StampRequestArgs),
}

/// `yes`/`no` switch, spelled the way CI jobs pass it.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Apply local_dependencies over dependencies
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub local: YesNo,

    /// Personal access token for private repositories
    #[arg(long, value_name = "TOKEN")]
    pub pat: Option<String>,
}

impl ProvisionArgs {
    /// The token, redacted from here on. Blank counts as absent.
    pub fn token(&self) -> Option<RedactedSecret> {
        self.pat
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(RedactedSecret::new)
    }
}

#[derive(Args, Debug)]
pub struct StampRequestArgs {
    /// Request file to process
    #[arg(long, value_name = "FILE")]
    pub config_path: PathBuf,

    /// Where to write the result (default: adjusted-<name> next to the input)
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// JSON object whose keys are set on every request
    #[arg(long, value_name = "JSON", default_value = "{}")]
    pub params_json: String,
}

/// `--root` if given, else the directory containing the running executable.
///
/// The process working directory is never used.
#[track_caller]
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf, ForecastEnvError> {
    let root = match explicit {
        Some(root) => root,
        None => std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .ok_or_else(|| root_error("Cannot determine the executable's directory".to_string()))?,
    };

    if !root.is_dir() {
        return Err(root_error(format!(
            "Workspace root {} is not a directory",
            root.display()
        )));
    }

    Ok(root)
}

#[track_caller]
fn root_error(reason: String) -> ForecastEnvError {
    CoreError::from(ConfigError::RootDirectory {
        location: common::ErrorLocation::from(std::panic::Location::caller()),
        reason,
    })
    .into()
}
