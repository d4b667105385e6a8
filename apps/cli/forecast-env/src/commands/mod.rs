//! One function per subcommand. `main` only parses, logs and maps the result
//! to an exit code.

pub mod provision;
pub mod stamp_request;

use crate::cli::{Cli, Command, resolve_root};
use crate::error::ForecastEnvError;
use crate::logger;

use log::info;

/// Resolve the root, start logging there and run the chosen command.
pub async fn execute(cli: Cli) -> Result<(), ForecastEnvError> {
    let root = resolve_root(cli.root)?;
    logger::initialize(&root, cli.verbose)?;
    info!("Workspace root: {}", root.display());

    match cli.command {
        Command::Prepare(args) => {
            provision::prepare(&root, &args).await?;
        }
        Command::Install(args) => {
            provision::install(&root, &args).await?;
        }
        Command::StampRequest(args) => {
            stamp_request::stamp(&args)?;
        }
    }

    Ok(())
}
