//! Where and as whom the data warehouse is reached.
//!
//! Values come from the optional `data_warehouse` section of `config.json`
//! and can be overridden per variable from the environment (a `.env` file in
//! the workspace root is loaded first).

use crate::error::config::ConfigError;

use common::RedactedSecret;

use std::env;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;

pub const BASE_URL_ENV: &str = "FORECAST_DW_BASE_URL";
pub const USERNAME_ENV: &str = "FORECAST_DW_USERNAME";
pub const PASSWORD_ENV: &str = "FORECAST_DW_PASSWORD";
pub(crate) const DOTENV_FILE_NAME: &str = ".env";

/// The `data_warehouse` section of `config.json`. Every field is optional.
#[derive(Clone, Default, Deserialize)]
pub struct DataWarehouseSection {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<RedactedSecret>,
}

impl std::fmt::Debug for DataWarehouseSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataWarehouseSection")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Fully resolved connection settings.
#[derive(Debug, Clone)]
pub struct DataWarehouseSettings {
    pub base_url: String,
    pub username: String,
    pub password: RedactedSecret,
}

impl DataWarehouseSettings {
    /// Resolve settings, letting `lookup` override values from the config section.
    ///
    /// `lookup` maps an environment variable name to its value. Blank values
    /// count as unset.
    pub fn resolve<F>(section: &DataWarehouseSection, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_blank(BASE_URL_ENV)
            .or_else(|| section.base_url.clone())
            .ok_or_else(|| {
                ConfigError::validation(format!(
                    "Data warehouse URL missing: set data_warehouse.base_url or {BASE_URL_ENV}"
                ))
            })?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::validation(format!(
                "Invalid data warehouse URL format: {base_url}"
            )));
        }

        let username = non_blank(USERNAME_ENV)
            .or_else(|| section.username.clone())
            .ok_or_else(|| {
                ConfigError::validation(format!(
                    "Data warehouse username missing: set data_warehouse.username or {USERNAME_ENV}"
                ))
            })?;

        let password = non_blank(PASSWORD_ENV)
            .map(RedactedSecret::new)
            .or_else(|| section.password.clone())
            .ok_or_else(|| {
                ConfigError::validation(format!(
                    "Data warehouse password missing: set data_warehouse.password or {PASSWORD_ENV}"
                ))
            })?;

        debug!("Data warehouse at {base_url} as {username}");

        Ok(Self {
            base_url,
            username,
            password,
        })
    }
}

/// Environment lookup backed by the process environment.
///
/// Loads `{root}/.env` first; a missing file is not an error and variables
/// already set in the environment are not overwritten.
pub fn process_environment(root: &Path) -> impl Fn(&str) -> Option<String> {
    let env_path = root.join(DOTENV_FILE_NAME);
    if env_path.exists() {
        match dotenvy::from_path(&env_path) {
            Ok(()) => info!("Loaded .env from: {}", env_path.display()),
            Err(e) => warn!("Failed to parse .env at {}: {e}", env_path.display()),
        }
    } else {
        debug!("No .env file at {}", env_path.display());
    }

    |key: &str| env::var(key).ok()
}
