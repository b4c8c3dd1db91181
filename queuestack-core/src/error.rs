//! Service error types and error envelope decoding

use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// One `<Error>` element of an error reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    /// `Sender` or `Receiver`
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorList {
    #[serde(rename = "Error", default)]
    errors: Vec<ErrorDetail>,
}

/// Error reply body.
///
/// The service answers either with a singular `<Error>` element or with an
/// `<Errors><Error>...</Error></Errors>` list, next to an envelope-level
/// request id.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorEnvelope {
    #[serde(default, alias = "RequestID")]
    pub request_id: String,
    #[serde(default)]
    errors: Option<ErrorList>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

/// Which of the two envelope shapes carried the error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorShape {
    /// `Errors>Error`, holding at least one element
    List(Vec<ErrorDetail>),
    /// A lone `Error` element
    Single(ErrorDetail),
    /// Neither form was present
    Missing,
}

impl ErrorShape {
    /// The element the error is built from: the first list entry, else the singular element
    pub fn primary(&self) -> Option<&ErrorDetail> {
        match self {
            Self::List(errors) => errors.first(),
            Self::Single(error) => Some(error),
            Self::Missing => None,
        }
    }
}

impl ErrorEnvelope {
    pub fn parse(body: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(body)
    }

    /// Resolve the envelope into one of its two shapes
    pub fn shape(&self) -> ErrorShape {
        match (&self.errors, &self.error) {
            (Some(list), _) if !list.errors.is_empty() => ErrorShape::List(list.errors.clone()),
            (_, Some(error)) => ErrorShape::Single(error.clone()),
            _ => ErrorShape::Missing,
        }
    }

    pub fn into_service_error(self, status_code: u16, status_line: &str) -> ServiceError {
        let detail = self.shape().primary().cloned().unwrap_or_default();
        let message = if detail.message.is_empty() {
            status_line.to_string()
        } else {
            detail.message
        };

        ServiceError {
            status_code,
            code: detail.code,
            message,
            request_id: self.request_id,
        }
    }
}

/// Error returned by the service for a non-200 reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub status_code: u16,
    /// Service-defined error code, e.g. `AWS.SimpleQueueService.NonExistentQueue`
    pub code: String,
    /// Never empty; falls back to the HTTP status line
    pub message: String,
    pub request_id: String,
}

impl ServiceError {
    /// Build an error from a non-200 reply.
    ///
    /// A body that is not a decodable error envelope still yields an error,
    /// carrying an empty code and the status line as message.
    pub fn from_response(status_code: u16, status_line: &str, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body);
        let envelope = ErrorEnvelope::parse(&body).unwrap_or_else(|e| {
            debug!(status = status_code, error = %e, "Undecodable error body");
            ErrorEnvelope::default()
        });
        envelope.into_service_error(status_code, status_line)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.code)
        }
    }
}

impl std::error::Error for ServiceError {}
