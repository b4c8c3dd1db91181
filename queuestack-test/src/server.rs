//! Mock SQS query endpoint

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::future::IntoFuture;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// One request as seen by the mock server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.param("Action")
    }
}

#[derive(Default)]
struct Shared {
    replies: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A mock query endpoint on a random local port.
///
/// The server runs on its own thread with a single-threaded tokio runtime, so
/// blocking clients can call it from plain `#[test]` functions.
pub struct MockServer {
    port: u16,
    base_url: String,
    shared: Arc<Shared>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Start a new mock server on a random available port
    pub fn start() -> Result<Self, TestError> {
        let listener = StdTcpListener::bind("127.0.0.1:0").map_err(TestError::Bind)?;
        listener.set_nonblocking(true).map_err(TestError::Bind)?;
        let port = listener.local_addr().map_err(TestError::Bind)?.port();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TestError::Runtime)?;

        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(handle).with_state(shared.clone());
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(e) => {
                        warn!(error = %e, "Mock server failed to register listener");
                        return;
                    }
                };

                tokio::select! {
                    result = axum::serve(listener, app).into_future() => {
                        if let Err(e) = result {
                            warn!(error = %e, "Mock server stopped");
                        }
                    }
                    _ = shutdown_rx => {}
                }
            });
        });

        let base_url = format!("http://127.0.0.1:{}", port);
        info!(url = %base_url, "Mock SQS server started");

        Ok(Self {
            port,
            base_url,
            shared,
            shutdown: Some(shutdown),
            thread: Some(thread),
        })
    }

    /// Get the base URL, usable as the region's SQS endpoint
    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Queue a reply; replies are served in the order they were queued
    pub fn reply(&self, status: u16, body: impl Into<String>) {
        self.shared.replies.lock().push_back((status, body.into()));
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.shared.requests.lock().last().cloned()
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            info!("Mock SQS server stopped");
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    uri: Uri,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    shared.requests.lock().push(RecordedRequest {
        path: uri.path().to_string(),
        params,
    });

    let Some((status, body)) = shared.replies.lock().pop_front() else {
        return xml_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("InternalError", "No reply queued"),
        );
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    xml_response(status, body)
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

/// Build a success reply: `<{action}Response>` with an optional result block and metadata
pub fn ok_body(action: &str, result_xml: &str) -> String {
    let result = if result_xml.is_empty() {
        String::new()
    } else {
        format!("<{0}Result>{1}</{0}Result>", action, result_xml)
    };

    format!(
        r#"<{0}Response xmlns="http://queue.amazonaws.com/doc/2011-10-01/">{1}<ResponseMetadata><RequestId>{2}</RequestId></ResponseMetadata></{0}Response>"#,
        action,
        result,
        uuid::Uuid::new_v4()
    )
}

/// Build an error reply in the singular `<Error>` shape
pub fn error_body(code: &str, message: &str) -> String {
    format!(
        r#"<ErrorResponse xmlns="http://queue.amazonaws.com/doc/2011-10-01/">
  <Error>
    <Type>Sender</Type>
    <Code>{}</Code>
    <Message>{}</Message>
    <Detail/>
  </Error>
  <RequestId>{}</RequestId>
</ErrorResponse>"#,
        code,
        message,
        uuid::Uuid::new_v4()
    )
}

/// Errors that can occur with the mock server
#[derive(Debug)]
pub enum TestError {
    Bind(std::io::Error),
    Runtime(std::io::Error),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Bind(e) => write!(f, "Failed to bind mock server: {}", e),
            TestError::Runtime(e) => write!(f, "Failed to build runtime: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_requests_and_replays() {
        let server = MockServer::start().unwrap();
        server.reply(200, ok_body("ListQueues", "<QueueUrl>u</QueueUrl>"));

        let url = format!("{}/123/q?Action=ListQueues&QueueNamePrefix=a%20b", server.url());
        let response = reqwest::blocking::get(url).unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body = response.text().unwrap();
        assert!(body.contains("<ListQueuesResult><QueueUrl>u</QueueUrl></ListQueuesResult>"));

        let request = server.last_request().unwrap();
        assert_eq!(request.path, "/123/q");
        assert_eq!(request.action(), Some("ListQueues"));
        assert_eq!(request.param("QueueNamePrefix"), Some("a b"));
    }

    #[test]
    fn test_missing_reply_is_an_error() {
        let server = MockServer::start().unwrap();
        let response = reqwest::blocking::get(server.url()).unwrap();
        assert_eq!(response.status().as_u16(), 500);
        assert!(response.text().unwrap().contains("No reply queued"));
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body("AccessDenied", "nope");
        assert!(body.contains("<Code>AccessDenied</Code>"));
        assert!(body.contains("<Message>nope</Message>"));
        assert!(body.contains("<RequestId>"));
    }
}
