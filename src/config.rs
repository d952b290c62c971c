//! Configuration for the Mermaid Chart companion
//!
//! Settings are built from defaults, an optional TOML file, and
//! `MERMAID_CHART_*` environment variables, with the environment taking
//! precedence. The two values the core needs are the service base URL and
//! the OAuth client ID the host identity flow presents.

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CompanionError, Result};

/// Default base endpoint of the hosted service
pub const DEFAULT_BASE_URL: &str = "https://www.mermaidchart.com";

/// Environment variable prefix for overrides (`MERMAID_CHART_BASE_URL`, ...)
const ENV_PREFIX: &str = "MERMAID_CHART";

/// Companion settings read from the host configuration surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base endpoint of the Mermaid Chart service
    pub base_url: String,

    /// OAuth client ID presented by the host identity flow
    pub client_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from defaults and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from defaults, an optional TOML file, and the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("client_id", "")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Reject settings the remote API cannot be reached with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(CompanionError::Validation(
                "base URL is not set".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CompanionError::Validation(format!(
                "base URL '{}' is not an http(s) URL",
                self.base_url
            )));
        }
        Ok(())
    }
}
