use forecast_env::cli::Cli;
use forecast_env::commands::execute;

use std::process::ExitCode;

use clap::Parser;
use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
