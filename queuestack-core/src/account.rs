//! Credentials and region descriptors

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Regions with a public SQS endpoint of the form `https://sqs.<name>.amazonaws.com`
const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "ap-south-1",
    "sa-east-1",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("Unknown region: {0}")]
    Unknown(String),
}

/// A service region: the signing region name and the SQS endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Region {
    pub name: String,
    pub sqs_endpoint: String,
}

impl Region {
    /// Create a region with an explicit endpoint (emulators, private endpoints)
    pub fn new(name: impl Into<String>, sqs_endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sqs_endpoint: sqs_endpoint.into(),
        }
    }

    /// Look up one of the well-known AWS regions by name
    pub fn from_name(name: &str) -> Result<Self, RegionError> {
        if KNOWN_REGIONS.contains(&name) {
            Ok(Self::new(name, format!("https://sqs.{}.amazonaws.com", name)))
        } else {
            Err(RegionError::Unknown(name.to_string()))
        }
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Access credentials used to sign requests
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_region_endpoint() {
        let region = Region::from_name("eu-west-1").unwrap();
        assert_eq!(region.name, "eu-west-1");
        assert_eq!(region.sqs_endpoint, "https://sqs.eu-west-1.amazonaws.com");

        let parsed: Region = "us-east-1".parse().unwrap();
        assert_eq!(parsed.sqs_endpoint, "https://sqs.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_unknown_region() {
        assert_eq!(
            Region::from_name("mars-north-1"),
            Err(RegionError::Unknown("mars-north-1".to_string()))
        );
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("AKIDEXAMPLE", "super-secret").with_session_token("tok");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("tok\""));
    }
}
