//! Client error taxonomy

use queuestack_auth::SignerError;
use queuestack_core::{RegionError, ServiceError};
use thiserror::Error;

use crate::transport::TransportError;

/// A success-path body that could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Debug, Error)]
pub enum SqsError {
    /// The HTTP exchange itself failed (DNS, connect, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-200 status
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The service answered 200 but the body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Signing failed: {0}")]
    Signer(#[from] SignerError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Region(#[from] RegionError),
}

impl SqsError {
    /// The service error, if the service rejected the request
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::DeError> for SqsError {
    fn from(e: quick_xml::DeError) -> Self {
        Self::Decode(DecodeError::Xml(e))
    }
}
