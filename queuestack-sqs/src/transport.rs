//! HTTP transport seam

use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// A fully read HTTP response.
///
/// The body is owned bytes, so the underlying connection has already been
/// released by the time a caller sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Status code and reason phrase, e.g. `404 Not Found`.
    ///
    /// The phrase is the canonical one for the code, not the phrase the server
    /// sent. Codes without a canonical phrase give just the number, e.g. `599`.
    pub status_line: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason());
        Self {
            status,
            status_line: status_line(status, reason),
            body: body.into(),
        }
    }
}

fn status_line(status: u16, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    }
}

/// Issues one blocking GET and returns the complete response
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by `reqwest`'s blocking client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_line: status_line(status.as_u16(), status.canonical_reason()),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        assert_eq!(HttpResponse::new(200, "").status_line, "200 OK");
        assert_eq!(HttpResponse::new(400, "").status_line, "400 Bad Request");
        assert_eq!(HttpResponse::new(599, "").status_line, "599");
    }
}
