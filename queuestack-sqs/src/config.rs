//! Client configuration

use queuestack_core::{Credentials, Region};
use serde::Deserialize;
use std::time::Duration;

use crate::SqsError;

/// Per-client options, fixed at construction
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Log full request URLs and raw response bodies
    #[serde(default)]
    pub debug: bool,

    /// Transport timeout; `None` leaves the HTTP client's default in place
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_user_agent() -> String {
    concat!("queuestack/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Everything needed to build an [`Sqs`](crate::Sqs) handle
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub credentials: Credentials,

    #[serde(default = "default_region")]
    pub region: String,

    /// Overrides the region's public endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub client: ClientConfig,
}

impl Settings {
    /// Load settings from `queuestack.toml` (optional) and `QUEUESTACK_*` variables.
    ///
    /// Nested keys use a double underscore, e.g. `QUEUESTACK_CREDENTIALS__ACCESS_KEY`.
    pub fn load() -> Result<Self, SqsError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("queuestack").required(false))
            .add_source(
                config::Environment::with_prefix("QUEUESTACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize::<Settings>()?)
    }

    /// Resolve the configured region, honouring an endpoint override
    pub fn region(&self) -> Result<Region, SqsError> {
        match &self.endpoint {
            Some(endpoint) => Ok(Region::new(self.region.clone(), endpoint.clone())),
            None => Ok(Region::from_name(&self.region)?),
        }
    }
}
