//! Embedding a personal access token into private repository URLs.

use crate::error::provisioning::ProvisioningError;
use crate::vcs::CloneUrl;

use common::{ErrorLocation, RedactedSecret};

use std::panic::Location;

use regex::Regex;
use url::Url;

/// Repositories of the forecasting organization on GitHub.
pub const DEFAULT_PRIVATE_URL_PATTERN: &str = r"^https://github\.com/OGR-EIU/";

/// Decides which dependency URLs get the clone token.
#[derive(Debug, Clone)]
pub struct CloneCredentials {
    token: Option<RedactedSecret>,
    private_pattern: Regex,
}

impl CloneCredentials {
    /// `token` of `None` (or an empty token) disables rewriting altogether.
    #[track_caller]
    pub fn new(token: Option<RedactedSecret>, private_pattern: &str) -> Result<Self, ProvisioningError> {
        let private_pattern = Regex::new(private_pattern).map_err(|e| ProvisioningError::Credentials {
            message: format!("Invalid private URL pattern '{private_pattern}': {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            token: token.filter(|t| !t.is_empty()),
            private_pattern,
        })
    }

    /// No token: every URL is cloned as written.
    pub fn anonymous() -> Self {
        Self {
            token: None,
            private_pattern: Regex::new(DEFAULT_PRIVATE_URL_PATTERN)
                .expect("valid regex pattern"),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_private(&self, url: &str) -> bool {
        self.private_pattern.is_match(url)
    }

    /// URL to hand to the clone.
    ///
    /// The token becomes the URL user-info only when a token is set and the URL
    /// matches the private pattern; any other URL is returned unchanged.
    #[track_caller]
    pub fn clone_url(&self, url: &str) -> Result<CloneUrl, ProvisioningError> {
        let token = match &self.token {
            Some(token) if self.is_private(url) => token,
            _ => return Ok(CloneUrl::plain(url)),
        };

        let mut parsed = Url::parse(url).map_err(|e| ProvisioningError::Credentials {
            message: format!("Cannot embed token into '{url}': {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let embedded = parsed.set_username(token.expose()).is_ok() && parsed.set_password(None).is_ok();
        if !embedded {
            return Err(ProvisioningError::Credentials {
                message: format!("Cannot embed token into '{url}': URL has no host"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Url percent-encodes the user-info, so scrub what actually appears in the text.
        let encoded_token = RedactedSecret::new(parsed.username());
        Ok(CloneUrl::with_secret(String::from(parsed), encoded_token))
    }
}
