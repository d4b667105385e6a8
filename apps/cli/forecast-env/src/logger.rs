//! Dual-output logging: coloured stdout plus a plain log file in the workspace root.

use crate::error::ForecastEnvError;

use common::ErrorLocation;

use std::io::stdout;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

static INIT_LOGGER_ONCE: Once = Once::new();

static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "forecast-env.log";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

#[cfg(debug_assertions)]
const LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: LevelFilter = LevelFilter::Info;

// HTTP stack internals are noise even at debug level.
const QUIET_TARGETS: [&str; 3] = ["hyper", "hyper_util", "reqwest"];

/// Level for this run: `Debug` when `verbose`, else the build default.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LOG_LEVEL }
}

/// Initialize the logger with dual output (stdout + `{log_dir}/forecast-env.log`).
///
/// Safe to call more than once: later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global logger is
/// already installed by someone else.
pub fn initialize(log_dir: &Path, verbose: bool) -> Result<(), ForecastEnvError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let level = level_for(verbose);
    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

#[track_caller]
fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), ForecastEnvError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let base_dispatch = QUIET_TARGETS
        .iter()
        .fold(Dispatch::new().level(level), |dispatch, target| {
            dispatch.level_for(*target, LevelFilter::Warn)
        });

    let stdout_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stdout());

    // File output keeps the source position for post-mortems.
    let file_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(
            fern::log_file(&log_file_path).map_err(|e| ForecastEnvError::ForecastEnv {
                message: format!("Failed to create log file {}: {e}", log_file_path.display()),
                location: ErrorLocation::from(Location::caller()),
            })?,
        );

    base_dispatch
        .chain(stdout_dispatch)
        .chain(file_dispatch)
        .apply()
        .map_err(|e| ForecastEnvError::ForecastEnv {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}
