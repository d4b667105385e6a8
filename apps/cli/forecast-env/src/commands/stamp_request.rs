use crate::cli::StampRequestArgs;
use crate::error::ForecastEnvError;

use provision_core::error::CoreError;
use provision_core::request::{default_output_path, parse_params, stamp_request_file};

use std::path::PathBuf;
use std::time::SystemTime;

pub fn stamp(args: &StampRequestArgs) -> Result<PathBuf, ForecastEnvError> {
    let params = parse_params(&args.params_json).map_err(CoreError::from)?;
    let output = args
        .output_file
        .clone()
        .unwrap_or_else(|| default_output_path(&args.config_path));

    stamp_request_file(&args.config_path, &output, &params, SystemTime::now())?;
    Ok(output)
}
