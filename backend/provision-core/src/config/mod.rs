pub mod data_warehouse;
pub mod environment;

pub use data_warehouse::{DataWarehouseSection, DataWarehouseSettings};
pub use environment::EnvironmentFiles;

use crate::config::data_warehouse::DOTENV_FILE_NAME;
use crate::error::config::ConfigError;
use crate::installer::credentials::DEFAULT_PRIVATE_URL_PATTERN;

use common::ErrorLocation;
use models::{DependencyRecord, DependencySet, DependencySpec};

use std::panic::Location;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_REQUEST_PATH: &str = "model/requests/input-data-request.json";
const DEFAULT_OUTPUT_PATH: &str = "input-data.json";

// ============================================
// FILE SHAPE
// ============================================

/// `config.json` as written by the CI step that starts a forecast round.
#[derive(Debug, Deserialize)]
struct RunConfigFile {
    #[serde(default)]
    dependencies: Map<String, Value>,

    #[serde(default, alias = "local-dependencies")]
    local_dependencies: Map<String, Value>,

    timestamp: String,

    #[serde(default)]
    environment: EnvironmentFiles,

    #[serde(default = "default_request_path")]
    request_path: PathBuf,

    #[serde(default = "default_output_path")]
    output_path: PathBuf,

    #[serde(default = "default_private_url_pattern")]
    private_url_pattern: String,

    #[serde(default)]
    data_warehouse: DataWarehouseSection,
}

fn default_request_path() -> PathBuf {
    PathBuf::from(DEFAULT_REQUEST_PATH)
}
fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}
fn default_private_url_pattern() -> String {
    DEFAULT_PRIVATE_URL_PATTERN.to_string()
}

// ============================================
// VALIDATED CONFIG
// ============================================

/// Declarative description of one forecast run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dependencies: DependencySet,
    pub local_dependencies: DependencySet,
    /// Snapshot time stamped onto every outgoing data request.
    pub timestamp: String,
    pub environment: EnvironmentFiles,
    /// Request batch file, relative to the workspace root.
    pub request_path: PathBuf,
    /// Retrieved-data artifact, relative to the workspace root.
    pub output_path: PathBuf,
    /// URLs matching this pattern get the clone token embedded.
    pub private_url_pattern: String,
    pub data_warehouse: DataWarehouseSection,
}

impl RunConfig {
    /// Load config from {root}/config.json.
    ///
    /// Unlike application preferences there is no fallback: a missing or
    /// malformed file stops the run before anything touches the disk.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE_NAME);

        let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::parse(&contents, &config_path)?;

        info!(
            "Config loaded from {} ({} dependencies, {} local overrides)",
            config_path.display(),
            config.dependencies.len(),
            config.local_dependencies.len()
        );
        Ok(config)
    }

    /// Parse and validate config text. `path` is only used in error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: RunConfigFile =
            serde_json::from_str(contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let config = RunConfig {
            dependencies: dependency_set(file.dependencies)?,
            local_dependencies: dependency_set(file.local_dependencies)?,
            timestamp: file.timestamp,
            environment: file.environment,
            request_path: file.request_path,
            output_path: file.output_path,
            private_url_pattern: file.private_url_pattern,
            data_warehouse: file.data_warehouse,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_iso8601(&self.timestamp) {
            return Err(ConfigError::validation(format!(
                "Invalid timestamp '{}' (expected ISO-8601, e.g. 2024-03-01T12:00:00Z)",
                self.timestamp
            )));
        }

        if let Err(e) = Regex::new(&self.private_url_pattern) {
            return Err(ConfigError::validation(format!(
                "Invalid private_url_pattern '{}': {e}",
                self.private_url_pattern
            )));
        }

        for path in [&self.request_path, &self.output_path] {
            if path.as_os_str().is_empty() || path.is_absolute() {
                return Err(ConfigError::validation(format!(
                    "Path '{}' must be relative to the workspace root",
                    path.display()
                )));
            }
        }

        self.environment.validate()?;

        let reserved = self.reserved_root_entries();
        for name in self.dependencies.names().chain(self.local_dependencies.names()) {
            if reserved.iter().any(|entry| entry == name) {
                return Err(ConfigError::validation(format!(
                    "Dependency name '{name}' collides with a workspace file"
                )));
            }
        }

        Ok(())
    }

    /// Files the pipeline reads or writes directly under the workspace root.
    fn reserved_root_entries(&self) -> Vec<String> {
        let mut entries = vec![
            CONFIG_FILE_NAME.to_string(),
            DOTENV_FILE_NAME.to_string(),
        ];

        if self.output_path.components().count() == 1 {
            entries.push(self.output_path.display().to_string());
        }

        entries.extend(self.environment.files.iter().cloned());
        entries
    }

    /// Dependencies to install for this run.
    ///
    /// In local mode `local_dependencies` is merged over `dependencies`,
    /// overrides winning on name collisions.
    pub fn resolved_dependencies(&self, local: bool) -> DependencySet {
        if local {
            self.dependencies.merged_with(&self.local_dependencies)
        } else {
            self.dependencies.clone()
        }
    }
}

/// RFC 3339 with any offset, a local date-time without offset, or a bare date.
fn is_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Build a set from a config map, skipping `null` sentinel entries.
#[track_caller]
fn dependency_set(entries: Map<String, Value>) -> Result<DependencySet, ConfigError> {
    let mut set = DependencySet::new();

    for (name, value) in entries {
        if value.is_null() {
            debug!("Skipping empty dependency entry '{name}'");
            continue;
        }

        let record: DependencyRecord = serde_json::from_value(value).map_err(|e| {
            ConfigError::validation(format!("Dependency '{name}' is malformed: {e}"))
        })?;

        let spec = DependencySpec::try_from(record)?;
        set.insert(name, spec)?;
    }

    Ok(set)
}
